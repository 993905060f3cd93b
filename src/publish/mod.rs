mod error;
mod templates;
mod writer;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use askama::Template;

use crate::frame::Frame;
use crate::geo::MarkerPoint;
use crate::geofence::Region;

pub use error::PublicationError;
pub use templates::MapTemplate;
pub use writer::write_atomic;

/// Stable path of the published artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation(PathBuf);

impl ArtifactLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `file://` URL for handing to a viewer.
    pub fn url(&self) -> String {
        let absolute = std::fs::canonicalize(&self.0).unwrap_or_else(|_| self.0.clone());
        format!("file://{}", absolute.display())
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Turns a frame into something a viewer can display.
pub trait Publisher {
    fn publish(&self, frame: &Frame) -> Result<ArtifactLocation, PublicationError>;
}

/// Everything on the map that does not change from frame to frame.
#[derive(Debug, Clone)]
pub struct MapSettings {
    pub title: String,
    pub center: (f64, f64),
    pub zoom: u8,
    pub region: Region,
    pub markers: Vec<MarkerPoint>,
    pub refresh_interval: Duration,
}

/// Publishes frames as a self-refreshing Leaflet map page.
#[derive(Debug, Clone)]
pub struct MapPublisher {
    settings: MapSettings,
    location: ArtifactLocation,
    snapshot_path: Option<PathBuf>,
}

impl MapPublisher {
    pub fn new(settings: MapSettings, path: PathBuf, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            settings,
            location: ArtifactLocation::new(path),
            snapshot_path,
        }
    }

    pub fn render(&self, frame: &Frame) -> Result<String, PublicationError> {
        Ok(MapTemplate::new(frame, &self.settings)?.render()?)
    }
}

impl Publisher for MapPublisher {
    fn publish(&self, frame: &Frame) -> Result<ArtifactLocation, PublicationError> {
        let html = self.render(frame)?;
        write_atomic(self.location.path(), html.as_bytes())?;

        if let Some(path) = &self.snapshot_path {
            let json = serde_json::to_vec_pretty(frame)?;
            write_atomic(path, &json)?;
        }

        log::info!(
            "Map updated: {} | Auto-refresh {}",
            self.location,
            humantime::format_duration(self.settings.refresh_interval)
        );
        Ok(self.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::catalog::Catalog;
    use crate::frame::testing::FixedPropagator;
    use crate::frame::build_frame;
    use crate::geo::GeodeticPosition;
    use crate::geofence::{default_advisories, AdvisoryRule, Geofence};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 8, 12, 0, 0).unwrap()
    }

    fn settings() -> MapSettings {
        MapSettings {
            title: "Satellite Geofence Tracker".to_string(),
            center: (30.0, 70.0),
            zoom: 6,
            region: Region::default(),
            markers: vec![MarkerPoint::from_coordinates("Observer (Islamabad)", "33.6844, 73.0479")
                .unwrap()],
            refresh_interval: Duration::from_secs(30),
        }
    }

    fn frame() -> Frame {
        frame_with(Geofence::new(Region::default(), default_advisories()))
    }

    fn frame_with(geofence: Geofence) -> Frame {
        let catalog = Catalog::embedded().unwrap();
        let oracle = FixedPropagator {
            positions: HashMap::from([(
                "THURAYA-3".to_string(),
                GeodeticPosition::new(30.0, 70.0, 35786.0),
            )]),
            fallback: GeodeticPosition::new(-12.5, 140.25, 520.0),
            failing: None,
        };
        build_frame(&catalog, &oracle, &geofence, now()).unwrap()
    }

    #[test]
    fn publishes_to_fixed_location_with_refresh_directive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.html");
        let publisher = MapPublisher::new(settings(), path.clone(), None);

        let location = publisher.publish(&frame()).unwrap();
        assert_eq!(location.path(), path.as_path());

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("setTimeout(() => location.reload(), 30000);"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn renders_one_circle_marker_per_observation() {
        let publisher = MapPublisher::new(settings(), PathBuf::from("unused.html"), None);
        let html = publisher.render(&frame()).unwrap();

        // Six satellites plus the observer.
        assert_eq!(html.matches("L.circleMarker(").count(), 7);
        assert_eq!(html.matches("color: \"crimson\"").count(), 1);
        assert_eq!(html.matches("color: \"orange\"").count(), 5);
        assert!(html.contains("radius: 18"));
        assert!(html.contains("radius: 8"));
    }

    #[test]
    fn popup_carries_identity_altitude_time_and_advisory() {
        let publisher = MapPublisher::new(settings(), PathBuf::from("unused.html"), None);
        let html = publisher.render(&frame()).unwrap();

        assert!(html.contains(
            r#"textPopup(["THURAYA-3","NORAD: 32404","Alt: 35786 km","Time: 2026-01-08 12:00:00 UTC","THURAYA COVERAGE ACTIVE"#
        ));
        assert!(html.contains(
            r#"textPopup(["PRSS-1","NORAD: 43530","Alt: 520 km","Time: 2026-01-08 12:00:00 UTC"])"#
        ));
    }

    #[test]
    fn draws_region_and_observer() {
        let publisher = MapPublisher::new(settings(), PathBuf::from("unused.html"), None);
        let html = publisher.render(&frame()).unwrap();

        assert!(html.contains(
            "L.rectangle([[23.000000, 60.000000], [39.000000, 80.000000]]"
        ));
        assert!(html.contains(r#"textPopup(["Pakistan Theater (incl. Azad Kashmir)"])"#));
        assert!(html.contains(r#"textPopup(["Observer (Islamabad)"])"#));
        assert!(html.contains("[33.684400, 73.047900]"));
        assert!(html.contains(r#"radius: 7, color: "red""#));
    }

    #[test]
    fn markup_in_labels_cannot_close_the_script() {
        let mut settings = settings();
        settings.markers[0].label = "</script><script>alert(1)</script>".to_string();
        settings.title = "<b>Tracker</b>".to_string();
        let publisher = MapPublisher::new(settings, PathBuf::from("unused.html"), None);
        let html = publisher.render(&frame()).unwrap();

        // leaflet.js include, the map script and the reload script
        assert_eq!(html.matches("</script>").count(), 3);
        assert!(html.contains(r#"textPopup(["<\/script><script>alert(1)<\/script>"])"#));
        assert!(html.contains("<title>&lt;b&gt;Tracker"));
    }

    #[test]
    fn multiline_and_backslash_text_stays_inside_string_literals() {
        let geofence = Geofence::new(
            Region::default(),
            vec![AdvisoryRule {
                pattern: "THURAYA".to_string(),
                text: "line one\nline two\\".to_string(),
            }],
        );
        let mut settings = settings();
        settings.markers[0].label = "Depot\\".to_string();
        settings.region.name = "Theater\nNorth".to_string();
        let publisher = MapPublisher::new(settings, PathBuf::from("unused.html"), None);
        let html = publisher.render(&frame_with(geofence)).unwrap();

        assert!(html.contains(r#"12:00:00 UTC","line one\nline two\\"])"#));
        assert!(html.contains(r#"textPopup(["Depot\\"])"#));
        assert!(html.contains(r#"textPopup(["Theater\nNorth"])"#));
        assert!(!html.contains("line one\n"));
        assert!(!html.contains("Theater\n"));
    }

    #[test]
    fn republishing_same_frame_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.html");
        let publisher = MapPublisher::new(settings(), path.clone(), None);
        let frame = frame();

        publisher.publish(&frame).unwrap();
        let first = fs::read(&path).unwrap();
        publisher.publish(&frame).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn writes_json_snapshot_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("frame.json");
        let publisher = MapPublisher::new(
            settings(),
            dir.path().join("tracker.html"),
            Some(snapshot.clone()),
        );
        publisher.publish(&frame()).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(&snapshot).unwrap()).unwrap();
        let observations = value["observations"].as_array().unwrap();
        assert_eq!(observations.len(), 6);
        assert_eq!(observations[5]["record"]["name"], "THURAYA-3");
        assert_eq!(observations[5]["severity"], "elevated");
        assert_eq!(observations[5]["in_region"], true);
    }

    #[test]
    fn location_url_is_file_scheme() {
        let location = ArtifactLocation::new("/tmp/tracker.html");
        assert!(location.url().starts_with("file:///"));
        assert_eq!(location.to_string(), "/tmp/tracker.html");
    }
}
