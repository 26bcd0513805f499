use std::collections::BTreeMap;
use std::time::Duration;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Identifies one scheduled timer. Handles must be unique per key for the
/// lifetime of a [`Watchdog`](crate::Watchdog), or stale timers may delete
/// live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> TimerHandle {
        TimerHandle(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TimerHandle {
    fn from(id: u64) -> TimerHandle {
        TimerHandle(id)
    }
}

/// One-shot timers for idle resets.
///
/// When a timer comes due, the host calls [`Watchdog::fire_idle_reset`]
/// with the key and handle it was scheduled with.
///
/// [`Watchdog::fire_idle_reset`]: crate::Watchdog::fire_idle_reset
pub trait Scheduler {
    fn schedule(&mut self, key: &str, deadline: Duration) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);
}

/// Timers ordered by deadline, for hosts that drive them from their own
/// loop with [`Watchdog::run_due_timers`].
///
/// [`Watchdog::run_due_timers`]: crate::Watchdog::run_due_timers
#[derive(Debug, Default)]
pub struct TimerQueue {
    next: u64,
    timers: BTreeMap<(Duration, TimerHandle), SmolStr>,
    deadlines: FxHashMap<TimerHandle, Duration>,
}

impl TimerQueue {
    pub fn new() -> TimerQueue {
        TimerQueue::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Removes the earliest timer if its deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(SmolStr, TimerHandle)> {
        let (&(deadline, handle), _) = self.timers.first_key_value()?;
        if deadline > now {
            return None;
        }
        let key = self.timers.remove(&(deadline, handle))?;
        self.deadlines.remove(&handle);
        Some((key, handle))
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, key: &str, deadline: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next);
        self.next += 1;
        self.timers.insert((deadline, handle), SmolStr::new(key));
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(deadline) = self.deadlines.remove(&handle) {
            self.timers.remove(&(deadline, handle));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Scheduler, TimerQueue};

    #[test]
    fn pops_in_deadline_order() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule("late", Duration::from_millis(9));
        let early = queue.schedule("early", Duration::from_millis(3));
        let cancelled = queue.schedule("cancelled", Duration::from_millis(1));
        queue.cancel(cancelled);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_deadline(), Some(Duration::from_millis(3)));
        assert_eq!(queue.pop_due(Duration::from_millis(2)), None);

        let now = Duration::from_millis(10);
        assert_eq!(queue.pop_due(now), Some(("early".into(), early)));
        assert_eq!(queue.pop_due(now), Some(("late".into(), late)));
        assert_eq!(queue.pop_due(now), None);
        assert!(queue.is_empty());
    }
}
