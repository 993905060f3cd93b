use chrono::{DateTime, Utc};
use sgp4::Constants;

use super::{PropagationError, Propagator};
use crate::catalog::SatelliteRecord;
use crate::geo::GeodeticPosition;

/// SGP4/SDP4 propagation via the `sgp4` crate, reduced to the sub-satellite point.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(
        &self,
        record: &SatelliteRecord,
        at: DateTime<Utc>,
    ) -> Result<GeodeticPosition, PropagationError> {
        let elements = record.element_set.elements();
        let timestamp = at.naive_utc();

        let constants =
            Constants::from_elements(elements).map_err(|e| PropagationError::Elements {
                name: record.name.clone(),
                reason: e.to_string(),
            })?;

        let minutes = elements
            .datetime_to_minutes_since_epoch(&timestamp)
            .map_err(|e| PropagationError::Epoch {
                name: record.name.clone(),
                reason: e.to_string(),
            })?;

        let prediction =
            constants
                .propagate(minutes)
                .map_err(|e| PropagationError::Propagation {
                    name: record.name.clone(),
                    reason: e.to_string(),
                })?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp));

        let ecef = teme_to_ecef_position(prediction.position, sidereal);
        Ok(GeodeticPosition::from_ecef_km(ecef))
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}
