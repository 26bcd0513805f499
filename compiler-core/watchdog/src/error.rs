use std::time::Duration;

use smol_str::SmolStr;
use tags::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripReason {
    Iterations { count: u64, limit: u64 },
    Elapsed { elapsed: Duration, limit: Duration },
}

/// A guarded loop ran for too long and was stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoopExceeded {
    pub tag: SmolStr,
    pub site: Tag,
    pub reason: TripReason,
    /// The message handed to the trip callback.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("trip callback failed: {message}")]
pub struct TripCallbackError {
    message: String,
}

impl TripCallbackError {
    pub fn new(message: impl Into<String>) -> TripCallbackError {
        TripCallbackError { message: message.into() }
    }
}
