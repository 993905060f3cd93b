use serde::Serialize;

// WGS-84 constants
pub const WGS84_RADIUS_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.00669437999014;

/// Leaflet colour for marker points that do not set one.
pub const DEFAULT_MARKER_COLOR: &str = "red";

const LATITUDE_TOLERANCE_RAD: f64 = 1e-10;
const MAX_LATITUDE_ITERATIONS: usize = 10;

/// Sub-satellite point relative to the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl GeodeticPosition {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_km: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_km,
        }
    }

    /// Converts an Earth-fixed position vector in km into geodetic coordinates.
    ///
    /// Latitude is refined iteratively against the ellipsoid; longitude comes
    /// straight from `atan2` and therefore stays within [-180, 180].
    pub fn from_ecef_km(ecef: [f64; 3]) -> Self {
        let [x, y, z] = ecef;
        let r = (x * x + y * y).sqrt();
        let longitude = y.atan2(x);

        if r < f64::EPSILON {
            // On the polar axis the iteration below divides by cos(lat) = 0.
            let polar_radius = WGS84_RADIUS_KM * (1.0 - WGS84_E2).sqrt();
            let latitude_deg = if z >= 0.0 { 90.0 } else { -90.0 };
            return Self::new(latitude_deg, longitude.to_degrees(), z.abs() - polar_radius);
        }

        let mut latitude = z.atan2(r);
        let mut c = 1.0;
        for _ in 0..MAX_LATITUDE_ITERATIONS {
            let phi = latitude;
            c = 1.0 / (1.0 - WGS84_E2 * phi.sin() * phi.sin()).sqrt();
            latitude = (z + WGS84_RADIUS_KM * c * WGS84_E2 * phi.sin()).atan2(r);
            if (latitude - phi).abs() < LATITUDE_TOLERANCE_RAD {
                break;
            }
        }

        let altitude_km = r / latitude.cos() - WGS84_RADIUS_KM * c;

        Self::new(latitude.to_degrees(), longitude.to_degrees(), altitude_km)
    }
}

/// A fixed labelled point drawn on the map, e.g. the observer location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPoint {
    pub label: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub color: String,
}

impl MarkerPoint {
    /// Parses `"lat, lon"` coordinates.
    pub fn from_coordinates(label: &str, coordinates: &str) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            latitude_deg: lat,
            longitude_deg: lon,
            color: DEFAULT_MARKER_COLOR.to_string(),
        })
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_ecef_km(lat_deg: f64, lon_deg: f64, alt_km: f64) -> [f64; 3] {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let n = WGS84_RADIUS_KM / (1.0 - WGS84_E2 * lat.sin() * lat.sin()).sqrt();
        [
            (n + alt_km) * lat.cos() * lon.cos(),
            (n + alt_km) * lat.cos() * lon.sin(),
            (n * (1.0 - WGS84_E2) + alt_km) * lat.sin(),
        ]
    }

    #[test]
    fn equator_point_above_prime_meridian() {
        let pos = GeodeticPosition::from_ecef_km([WGS84_RADIUS_KM + 500.0, 0.0, 0.0]);
        assert!(pos.latitude_deg.abs() < 1e-9);
        assert!(pos.longitude_deg.abs() < 1e-9);
        assert!((pos.altitude_km - 500.0).abs() < 1e-6);
    }

    #[test]
    fn recovers_geodetic_coordinates_over_region() {
        let ecef = to_ecef_km(30.0, 70.0, 500.0);
        let pos = GeodeticPosition::from_ecef_km(ecef);
        assert!((pos.latitude_deg - 30.0).abs() < 1e-6);
        assert!((pos.longitude_deg - 70.0).abs() < 1e-6);
        assert!((pos.altitude_km - 500.0).abs() < 1e-3);
    }

    #[test]
    fn western_hemisphere_longitude_is_negative() {
        let ecef = to_ecef_km(-45.0, -120.0, 35786.0);
        let pos = GeodeticPosition::from_ecef_km(ecef);
        assert!((pos.longitude_deg + 120.0).abs() < 1e-6);
        assert!((pos.latitude_deg + 45.0).abs() < 1e-6);
    }

    #[test]
    fn polar_axis_does_not_blow_up() {
        let pos = GeodeticPosition::from_ecef_km([0.0, 0.0, 7000.0]);
        assert_eq!(pos.latitude_deg, 90.0);
        assert!(pos.altitude_km > 600.0 && pos.altitude_km < 700.0);
    }

    #[test]
    fn marker_from_coordinates() {
        let marker = MarkerPoint::from_coordinates("Observer", "33.6844, 73.0479").unwrap();
        assert_eq!(marker.latitude_deg, 33.6844);
        assert_eq!(marker.longitude_deg, 73.0479);
        assert_eq!(marker.label, "Observer");
        assert_eq!(marker.color, "red");
        assert_eq!(marker.with_color("green").color, "green");
    }

    #[test]
    fn marker_rejects_bad_coordinates() {
        assert!(MarkerPoint::from_coordinates("x", "33.6").is_none());
        assert!(MarkerPoint::from_coordinates("x", "north, east").is_none());
        assert!(MarkerPoint::from_coordinates("x", "95.0, 10.0").is_none());
        assert!(MarkerPoint::from_coordinates("x", "1, 2, 3").is_none());
    }
}
