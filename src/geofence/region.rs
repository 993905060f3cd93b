use serde::{Deserialize, Serialize};

use crate::geo::GeodeticPosition;

/// Rectangular latitude/longitude box. Membership is strict: points on the
/// boundary are outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            name: "Pakistan Theater (incl. Azad Kashmir)".to_string(),
            lat_min: 23.0,
            lat_max: 39.0,
            lon_min: 60.0,
            lon_max: 80.0,
        }
    }
}

impl Region {
    pub fn contains(&self, position: &GeodeticPosition) -> bool {
        self.lat_min < position.latitude_deg
            && position.latitude_deg < self.lat_max
            && self.lon_min < position.longitude_deg
            && position.longitude_deg < self.lon_max
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.lat_min < self.lat_max) {
            return Err(format!(
                "region lat_min ({}) must be below lat_max ({})",
                self.lat_min, self.lat_max
            ));
        }
        if !(self.lon_min < self.lon_max) {
            return Err(format!(
                "region lon_min ({}) must be below lon_max ({})",
                self.lon_min, self.lon_max
            ));
        }
        if self.lat_min < -90.0 || self.lat_max > 90.0 {
            return Err("region latitude must lie within [-90, 90]".to_string());
        }
        if self.lon_min < -180.0 || self.lon_max > 180.0 {
            return Err("region longitude must lie within [-180, 180]".to_string());
        }
        Ok(())
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }
}
