use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// The time source and frame marker a [`Watchdog`] reads on every call.
///
/// [`Watchdog`]: crate::Watchdog
pub trait Clock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    /// An identifier for the host's current outer tick, such as an
    /// animation frame. Guard state resets whenever it changes.
    fn current_frame(&self) -> Option<u64>;
}

/// A frame counter shared between a host loop and a [`SystemClock`].
#[derive(Debug, Clone, Default)]
pub struct FrameCounter(Rc<Cell<u64>>);

impl FrameCounter {
    pub fn new() -> FrameCounter {
        FrameCounter::default()
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// Moves to the next frame, returning its marker.
    pub fn advance(&self) -> u64 {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        next
    }
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    frames: Option<FrameCounter>,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock { origin: Instant::now(), frames: None }
    }

    pub fn with_frames(frames: FrameCounter) -> SystemClock {
        SystemClock { origin: Instant::now(), frames: Some(frames) }
    }
}

impl Default for SystemClock {
    fn default() -> SystemClock {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn current_frame(&self) -> Option<u64> {
        self.frames.as_ref().map(FrameCounter::get)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    frame: Rc<Cell<Option<u64>>>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set_frame(&self, frame: Option<u64>) {
        self.frame.set(frame);
    }

    /// Moves to the next frame, starting from zero.
    pub fn next_frame(&self) -> u64 {
        let next = self.frame.get().map_or(0, |frame| frame.wrapping_add(1));
        self.frame.set(Some(next));
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn current_frame(&self) -> Option<u64> {
        self.frame.get()
    }
}
