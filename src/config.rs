use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::geo::{MarkerPoint, DEFAULT_MARKER_COLOR};
use crate::geofence::{default_advisories, AdvisoryRule, Region};
use crate::publish::MapSettings;
use crate::scheduler::SchedulePolicy;

const MAX_ZOOM: u8 = 19;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: Region,
    pub markers: Vec<MarkerConfig>,
    pub advisories: Vec<AdvisoryRule>,
    pub refresh: RefreshConfig,
    pub output: OutputConfig,
    pub map: MapConfig,
    pub catalog: CatalogConfig,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::default(),
            markers: vec![MarkerConfig {
                label: "Observer (Islamabad)".to_string(),
                coordinates: "33.6844, 73.0479".to_string(),
                color: default_marker_color(),
            }],
            advisories: default_advisories(),
            refresh: RefreshConfig::default(),
            output: OutputConfig::default(),
            map: MapConfig::default(),
            catalog: CatalogConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkerConfig {
    pub label: String,
    pub coordinates: String,
    #[serde(default = "default_marker_color")]
    pub color: String,
}

fn default_marker_color() -> String {
    DEFAULT_MARKER_COLOR.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
    pub policy: SchedulePolicy,
    /// Stop the loop after this many failed ticks in a row. Unset retries forever.
    pub max_consecutive_failures: Option<u32>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            policy: SchedulePolicy::FixedDelay,
            max_consecutive_failures: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join("sat_geofence_tracker.html"),
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    /// `"lat, lon"`; the region centre is used when unset.
    pub center: Option<String>,
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Satellite Geofence Tracker".to_string(),
            center: Some("30.0, 70.0".to_string()),
            zoom: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub tle_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub enabled: bool,
    /// Viewer program; the platform opener is used when unset.
    pub command: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.region.validate().map_err(ConfigError::Invalid)?;
        if self.refresh.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "refresh interval must be greater than zero".into(),
            ));
        }
        if self.refresh.max_consecutive_failures == Some(0) {
            return Err(ConfigError::Invalid(
                "max_consecutive_failures must be at least 1".into(),
            ));
        }
        if self.map.zoom > MAX_ZOOM {
            return Err(ConfigError::Invalid(format!(
                "map zoom {} exceeds {}",
                self.map.zoom, MAX_ZOOM
            )));
        }
        if self.advisories.iter().any(|a| a.pattern.is_empty()) {
            return Err(ConfigError::Invalid(
                "advisory pattern must not be empty".into(),
            ));
        }
        self.markers()?;
        self.map_center()?;
        Ok(())
    }

    pub fn markers(&self) -> Result<Vec<MarkerPoint>, ConfigError> {
        self.markers
            .iter()
            .map(|m| {
                MarkerPoint::from_coordinates(&m.label, &m.coordinates)
                    .map(|p| p.with_color(&m.color))
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!(
                            "marker '{}' has invalid coordinates '{}'",
                            m.label, m.coordinates
                        ))
                    })
            })
            .collect()
    }

    pub fn map_center(&self) -> Result<(f64, f64), ConfigError> {
        match &self.map.center {
            Some(coordinates) => MarkerPoint::from_coordinates("center", coordinates)
                .map(|p| (p.latitude_deg, p.longitude_deg))
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("invalid map center '{}'", coordinates))
                }),
            None => Ok(self.region.center()),
        }
    }

    pub fn map_settings(&self) -> Result<MapSettings, ConfigError> {
        Ok(MapSettings {
            title: self.map.title.clone(),
            center: self.map_center()?,
            zoom: self.map.zoom,
            region: self.region.clone(),
            markers: self.markers()?,
            refresh_interval: self.refresh.interval,
        })
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}
