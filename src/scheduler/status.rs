use std::path::PathBuf;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoopState {
    Idle,
    Building,
    Publishing,
    Sleeping,
    Stopped,
}

/// Snapshot of the refresh loop, readable while it runs.
#[derive(Debug, Clone)]
pub struct SchedulerStatus {
    pub state: LoopState,
    pub ticks: u64,
    pub frames_published: u64,
    pub last_captured_at: Option<DateTime<Utc>>,
    pub last_artifact: Option<PathBuf>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl Default for SchedulerStatus {
    fn default() -> Self {
        Self {
            state: LoopState::Idle,
            ticks: 0,
            frames_published: 0,
            last_captured_at: None,
            last_artifact: None,
            last_error: None,
            consecutive_failures: 0,
        }
    }
}
