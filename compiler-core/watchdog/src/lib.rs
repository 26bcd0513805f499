//! Runtime side of loop guarding.
//!
//! Instrumented code calls [`Watchdog::guard`] once per loop iteration. The
//! watchdog keeps a [`GuardState`] per tag and reports [`LoopExceeded`] once
//! a loop runs for too many iterations or for too long without the host
//! getting control back.

mod clock;
mod config;
mod error;
mod scheduler;
mod state;

use std::panic::{self, AssertUnwindSafe};

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tags::{DEFAULT_TAG, Tag};

pub use clock::{Clock, FrameCounter, ManualClock, SystemClock};
pub use config::{
    DEFAULT_IDLE_RESET, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_TIME, WatchdogConfig, WatchdogOverrides,
};
pub use error::{LoopExceeded, TripCallbackError, TripReason};
pub use scheduler::{Scheduler, TimerHandle, TimerQueue};
pub use state::GuardState;

type TripCallback = Box<dyn FnMut(&str, &str) -> Result<(), TripCallbackError>>;

pub struct Watchdog<C, S> {
    config: WatchdogConfig,
    clock: C,
    scheduler: S,
    registry: FxHashMap<SmolStr, GuardState>,
    on_trip: Option<TripCallback>,
}

impl<C: Clock, S: Scheduler> Watchdog<C, S> {
    pub fn new(config: WatchdogConfig, clock: C, scheduler: S) -> Watchdog<C, S> {
        let registry = FxHashMap::default();
        Watchdog { config, clock, scheduler, registry, on_trip: None }
    }

    /// Registers the function notified with `(tag, message)` when a loop
    /// trips. Its errors and panics are logged and otherwise ignored.
    pub fn on_trip<F>(&mut self, callback: F)
    where
        F: FnMut(&str, &str) -> Result<(), TripCallbackError> + 'static,
    {
        self.on_trip = Some(Box::new(callback));
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn state(&self, tag: &str) -> Option<&GuardState> {
        self.registry.get(tag)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Records one iteration of the loop identified by `tag`.
    pub fn guard(&mut self, tag: Option<&str>) -> Result<(), LoopExceeded> {
        if !self.config.enabled {
            return Ok(());
        }

        let key = tag.filter(|tag| !tag.is_empty()).unwrap_or(DEFAULT_TAG);
        let now = self.clock.now();
        let frame = self.clock.current_frame();
        let idle_reset = self.config.idle_reset;
        let deadline = now.saturating_add(idle_reset);

        let (count, start) = match self.registry.get_mut(key) {
            Some(state) => {
                if state.should_reset(now, frame, idle_reset) {
                    state.count = 0;
                    state.start = now;
                }
                state.frame = frame;
                state.last = now;
                state.count += 1;

                if let Some(handle) = state.pending_reset.take() {
                    self.scheduler.cancel(handle);
                }
                state.pending_reset = Some(self.scheduler.schedule(key, deadline));

                (state.count, state.start)
            }
            None => {
                let mut state = GuardState::new(now, frame);
                state.count = 1;
                state.pending_reset = Some(self.scheduler.schedule(key, deadline));
                self.registry.insert(SmolStr::new(key), state);
                (1, now)
            }
        };

        let elapsed = now.saturating_sub(start);
        let reason = if count > self.config.max_iterations {
            TripReason::Iterations { count, limit: self.config.max_iterations }
        } else if elapsed > self.config.max_time {
            TripReason::Elapsed { elapsed, limit: self.config.max_time }
        } else {
            return Ok(());
        };

        Err(self.trip(key, reason))
    }

    fn trip(&mut self, key: &str, reason: TripReason) -> LoopExceeded {
        if let Some(state) = self.registry.remove(key)
            && let Some(handle) = state.pending_reset
        {
            self.scheduler.cancel(handle);
        }

        let message = tags::diagnostic(key);
        tracing::warn!(tag = key, ?reason, "Stopped a runaway loop");

        if let Some(callback) = self.on_trip.as_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| callback(key, &message))) {
                Ok(Ok(())) => (),
                Ok(Err(error)) => tracing::warn!(tag = key, %error, "Ignoring trip callback error"),
                Err(_) => tracing::warn!(tag = key, "Ignoring trip callback panic"),
            }
        }

        LoopExceeded { tag: SmolStr::new(key), site: Tag::decode(key), reason, message }
    }

    /// Forgets every loop and cancels their idle timers.
    pub fn reset_all(&mut self) {
        for (_, state) in self.registry.drain() {
            if let Some(handle) = state.pending_reset {
                self.scheduler.cancel(handle);
            }
        }
    }

    /// Called by the host when an idle timer fires. Timers superseded by a
    /// later guard call are ignored.
    pub fn fire_idle_reset(&mut self, key: &str, handle: TimerHandle) {
        let pending = self.registry.get(key).and_then(|state| state.pending_reset);
        if pending == Some(handle) {
            self.registry.remove(key);
            tracing::trace!(tag = key, "Idle reset");
        }
    }
}

impl<C: Clock> Watchdog<C, TimerQueue> {
    /// Fires every idle timer that is due, returning how many fired.
    pub fn run_due_timers(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some((key, handle)) = self.scheduler.pop_due(now) {
            self.fire_idle_reset(&key, handle);
            fired += 1;
        }
        fired
    }
}
