use std::time::Duration;

use crate::TimerHandle;

/// Execution state for one loop site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardState {
    /// Iterations since the last reset.
    pub count: u64,
    pub start: Duration,
    pub last: Duration,
    pub frame: Option<u64>,
    pub pending_reset: Option<TimerHandle>,
}

impl GuardState {
    pub(crate) fn new(now: Duration, frame: Option<u64>) -> GuardState {
        GuardState { count: 0, start: now, last: now, frame, pending_reset: None }
    }

    /// Whether a call at `now` in `frame` starts a new run of the loop.
    ///
    /// Frame markers take precedence; without them, a gap longer than
    /// `idle_reset` since the previous call counts as a new run.
    pub fn should_reset(&self, now: Duration, frame: Option<u64>, idle_reset: Duration) -> bool {
        match (self.frame, frame) {
            (Some(stored), Some(current)) => stored != current,
            (None, None) => now.saturating_sub(self.last) > idle_reset,
            _ => true,
        }
    }
}
