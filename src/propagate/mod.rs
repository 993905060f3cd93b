mod error;
mod sgp4_oracle;

use chrono::{DateTime, Utc};

use crate::catalog::SatelliteRecord;
use crate::geo::GeodeticPosition;

pub use sgp4_oracle::Sgp4Propagator;
pub use error::PropagationError;

/// Computes where a satellite is over the Earth at a given instant.
pub trait Propagator {
    fn propagate(
        &self,
        record: &SatelliteRecord,
        at: DateTime<Utc>,
    ) -> Result<GeodeticPosition, PropagationError>;
}
