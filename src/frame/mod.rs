use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{Catalog, SatelliteRecord};
use crate::geo::GeodeticPosition;
use crate::geofence::{Geofence, Severity};
use crate::propagate::{PropagationError, Propagator};

/// One satellite's classified state at the frame's capture instant.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub record: Arc<SatelliteRecord>,
    pub position: GeodeticPosition,
    pub captured_at: DateTime<Utc>,
    pub in_region: bool,
    pub severity: Severity,
    pub annotations: BTreeSet<String>,
}

impl Observation {
    /// Console line in the `NAME (NORAD id) | Lat | Lon | Alt` layout.
    pub fn report_line(&self) -> String {
        format!(
            "{} (NORAD {}) | Lat: {:.4}° | Lon: {:.4}° | Alt: {:.1} km",
            self.record.name,
            self.record.norad_id,
            self.position.latitude_deg,
            self.position.longitude_deg,
            self.position.altitude_km
        )
    }
}

/// Every catalog entry observed at one shared instant, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    captured_at: DateTime<Utc>,
    observations: Vec<Observation>,
}

impl Frame {
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn in_region_count(&self) -> usize {
        self.observations.iter().filter(|o| o.in_region).count()
    }
}

/// Propagates and classifies every catalog entry at `now`.
///
/// Fails as a whole on the first propagation error; no partial frame is ever
/// returned.
pub fn build_frame<P>(
    catalog: &Catalog,
    propagator: &P,
    geofence: &Geofence,
    now: DateTime<Utc>,
) -> Result<Frame, PropagationError>
where
    P: Propagator + ?Sized,
{
    let observations = catalog
        .iter()
        .map(|record| {
            let position = propagator.propagate(record, now)?;
            let classification = geofence.classify(&record.name, &position);
            Ok(Observation {
                record: Arc::clone(record),
                position,
                captured_at: now,
                in_region: classification.in_region,
                severity: classification.severity,
                annotations: classification.annotations,
            })
        })
        .collect::<Result<Vec<_>, PropagationError>>()?;

    Ok(Frame {
        captured_at: now,
        observations,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Oracle returning fixed positions per satellite name.
    pub struct FixedPropagator {
        pub positions: HashMap<String, GeodeticPosition>,
        pub fallback: GeodeticPosition,
        pub failing: Option<String>,
    }

    impl FixedPropagator {
        pub fn everywhere(position: GeodeticPosition) -> Self {
            Self {
                positions: HashMap::new(),
                fallback: position,
                failing: None,
            }
        }
    }

    impl Propagator for FixedPropagator {
        fn propagate(
            &self,
            record: &SatelliteRecord,
            _at: DateTime<Utc>,
        ) -> Result<GeodeticPosition, PropagationError> {
            if self.failing.as_deref() == Some(record.name.as_str()) {
                return Err(PropagationError::Propagation {
                    name: record.name.clone(),
                    reason: "decayed".to_string(),
                });
            }
            Ok(self
                .positions
                .get(&record.name)
                .copied()
                .unwrap_or(self.fallback))
        }
    }
}
