use askama::Template;
use serde::Serialize;

use super::MapSettings;
use crate::frame::{Frame, Observation};
use crate::geofence::Severity;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fields ending in `_js` hold JavaScript literals and are emitted unescaped.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub title: String,
    pub center_lat: String,
    pub center_lon: String,
    pub zoom: u8,
    pub captured_at: String,
    pub region: RegionOverlay,
    pub markers: Vec<PointMarker>,
    pub observations: Vec<ObservationMarker>,
    pub refresh_ms: u128,
}

pub struct RegionOverlay {
    pub name_js: String,
    pub lat_min: String,
    pub lat_max: String,
    pub lon_min: String,
    pub lon_max: String,
}

pub struct PointMarker {
    pub label_js: String,
    pub color_js: String,
    pub lat: String,
    pub lon: String,
}

pub struct ObservationMarker {
    pub lat: String,
    pub lon: String,
    pub radius: u32,
    pub color: &'static str,
    pub fill_opacity: &'static str,
    pub popup_js: String,
}

impl MapTemplate {
    pub fn new(frame: &Frame, settings: &MapSettings) -> Result<Self, serde_json::Error> {
        let region = &settings.region;
        let markers = settings
            .markers
            .iter()
            .map(|m| {
                Ok(PointMarker {
                    label_js: js_literal(&m.label)?,
                    color_js: js_literal(&m.color)?,
                    lat: coord(m.latitude_deg),
                    lon: coord(m.longitude_deg),
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        let observations = frame
            .observations()
            .iter()
            .map(observation_marker)
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            title: settings.title.clone(),
            center_lat: coord(settings.center.0),
            center_lon: coord(settings.center.1),
            zoom: settings.zoom,
            captured_at: frame.captured_at().format(TIME_FORMAT).to_string(),
            region: RegionOverlay {
                name_js: js_literal(&region.name)?,
                lat_min: coord(region.lat_min),
                lat_max: coord(region.lat_max),
                lon_min: coord(region.lon_min),
                lon_max: coord(region.lon_max),
            },
            markers,
            observations,
            refresh_ms: settings.refresh_interval.as_millis(),
        })
    }
}

fn observation_marker(obs: &Observation) -> Result<ObservationMarker, serde_json::Error> {
    let (radius, color, fill_opacity) = match obs.severity {
        Severity::Elevated => (18, "crimson", "0.9"),
        Severity::Nominal => (8, "orange", "0.6"),
    };

    let mut popup = vec![
        obs.record.name.clone(),
        format!("NORAD: {}", obs.record.norad_id),
        format!("Alt: {:.0} km", obs.position.altitude_km),
        format!("Time: {} UTC", obs.captured_at.format(TIME_FORMAT)),
    ];
    popup.extend(obs.annotations.iter().cloned());

    Ok(ObservationMarker {
        lat: coord(obs.position.latitude_deg),
        lon: coord(obs.position.longitude_deg),
        radius,
        color,
        fill_opacity,
        popup_js: js_literal(&popup)?,
    })
}

/// Encodes `value` as JSON that can sit inside an inline `<script>`: no
/// `</` or `<!--` survives to close the element early.
fn js_literal<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace("</", "<\\/")
        .replace("<!--", "\\u003c!--"))
}

fn coord(value: f64) -> String {
    format!("{:.6}", value)
}
