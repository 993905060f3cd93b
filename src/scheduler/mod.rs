mod error;
mod runner;
mod status;

use serde::Deserialize;

pub use runner::{first_publish, Scheduler};

/// How the next tick is timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SchedulePolicy {
    /// Next tick starts one interval after the previous publish completed.
    FixedDelay,
    /// Ticks are anchored to the first tick; overrunning ticks are skipped.
    FixedRate,
}
