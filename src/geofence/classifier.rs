use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::region::Region;
use crate::geo::GeodeticPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Nominal,
    Elevated,
}

/// Advisory attached to satellites whose name contains `pattern` while they
/// are over the region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRule {
    pub pattern: String,
    pub text: String,
}

impl AdvisoryRule {
    pub fn matches(&self, satellite_name: &str) -> bool {
        satellite_name.contains(&self.pattern)
    }
}

pub fn default_advisories() -> Vec<AdvisoryRule> {
    vec![AdvisoryRule {
        pattern: "THURAYA".to_string(),
        text: "THURAYA COVERAGE ACTIVE: Satphone ops possible Pakistan/Azad Kashmir. \
               NO PUBLIC LIVE DEVICE TRACKING"
            .to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub in_region: bool,
    pub severity: Severity,
    pub annotations: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct Geofence {
    pub region: Region,
    pub advisories: Vec<AdvisoryRule>,
}

impl Geofence {
    pub fn new(region: Region, advisories: Vec<AdvisoryRule>) -> Self {
        Self { region, advisories }
    }

    pub fn classify(&self, satellite_name: &str, position: &GeodeticPosition) -> Classification {
        let in_region = self.region.contains(position);
        let severity = if in_region {
            Severity::Elevated
        } else {
            Severity::Nominal
        };

        let annotations = if in_region {
            self.advisories
                .iter()
                .filter(|rule| rule.matches(satellite_name))
                .map(|rule| rule.text.clone())
                .collect()
        } else {
            BTreeSet::new()
        };

        Classification {
            in_region,
            severity,
            annotations,
        }
    }
}
