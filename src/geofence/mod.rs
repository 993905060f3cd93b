mod classifier;
mod region;

pub use classifier::{default_advisories, AdvisoryRule, Geofence, Severity};
pub use region::Region;
