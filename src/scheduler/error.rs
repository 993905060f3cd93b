use thiserror::Error;

use crate::propagate::PropagationError;
use crate::publish::PublicationError;

/// Why a single tick produced no artifact.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("frame build failed: {0}")]
    Propagation(#[from] PropagationError),
    #[error("publication failed: {0}")]
    Publication(#[from] PublicationError),
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("giving up after {failures} consecutive failed ticks, last error: {last_error}")]
    TooManyFailures { failures: u32, last_error: String },
    #[error("refresh task ended abnormally: {0}")]
    Join(#[from] tokio::task::JoinError),
}
