use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tags::{LoopKind, TagKind};
use watchdog::{
    ManualClock, Scheduler, TimerHandle, TimerQueue, TripCallbackError, TripReason, Watchdog,
    WatchdogConfig,
};

const TAG: &str = "sketch.js@WhileStatement@3:2";

fn watchdog(config: WatchdogConfig) -> (Watchdog<ManualClock, TimerQueue>, ManualClock) {
    let clock = ManualClock::new();
    let watchdog = Watchdog::new(config, clock.clone(), TimerQueue::new());
    (watchdog, clock)
}

fn with_iterations(max_iterations: u64) -> WatchdogConfig {
    WatchdogConfig { max_iterations, ..WatchdogConfig::default() }
}

#[test]
fn trips_after_max_iterations() {
    let (mut watchdog, _) = watchdog(with_iterations(5));

    for _ in 0..5 {
        watchdog.guard(Some(TAG)).unwrap();
    }
    let error = watchdog.guard(Some(TAG)).unwrap_err();

    assert_eq!(error.reason, TripReason::Iterations { count: 6, limit: 5 });
    assert_eq!(error.tag, TAG);
    assert_eq!(error.site.kind, TagKind::Known(LoopKind::While));
    insta::assert_snapshot!(
        error.to_string(),
        @"Possible infinite loop: the while loop at line 3 in sketch.js ran too long and was stopped."
    );

    assert!(watchdog.state(TAG).is_none());
    assert!(watchdog.scheduler().is_empty());
}

#[test]
fn trips_after_max_time() {
    let config = WatchdogConfig { max_time: Duration::from_millis(10), ..WatchdogConfig::default() };
    let (mut watchdog, clock) = watchdog(config);
    clock.set_frame(Some(1));

    watchdog.guard(Some(TAG)).unwrap();
    clock.advance(Duration::from_millis(11));
    let error = watchdog.guard(Some(TAG)).unwrap_err();

    assert_eq!(
        error.reason,
        TripReason::Elapsed {
            elapsed: Duration::from_millis(11),
            limit: Duration::from_millis(10)
        }
    );
}

#[test]
fn frame_changes_reset_counts() {
    let (mut watchdog, clock) = watchdog(with_iterations(100));

    for call in 1..=150 {
        if matches!(call, 1 | 60 | 120) {
            clock.next_frame();
        }
        clock.advance(Duration::from_micros(10));
        watchdog.guard(Some(TAG)).unwrap();
    }

    let state = watchdog.state(TAG).unwrap();
    assert_eq!(state.count, 31);
    assert_eq!(state.frame, Some(2));
}

#[test]
fn idle_gap_resets_count() {
    let (mut watchdog, clock) = watchdog(WatchdogConfig::default());

    watchdog.guard(Some(TAG)).unwrap();
    watchdog.guard(Some(TAG)).unwrap();
    assert_eq!(watchdog.state(TAG).unwrap().count, 2);

    clock.advance(Duration::from_millis(6));
    watchdog.guard(Some(TAG)).unwrap();
    assert_eq!(watchdog.state(TAG).unwrap().count, 1);
}

#[test]
fn idle_timer_deletes_state() {
    let (mut watchdog, clock) = watchdog(WatchdogConfig::default());

    watchdog.guard(Some(TAG)).unwrap();
    clock.advance(Duration::from_millis(4));
    assert_eq!(watchdog.run_due_timers(), 0);

    // The second call supersedes the first timer.
    watchdog.guard(Some(TAG)).unwrap();
    clock.advance(Duration::from_millis(4));
    assert_eq!(watchdog.run_due_timers(), 0);
    assert_eq!(watchdog.state(TAG).unwrap().count, 2);

    clock.advance(Duration::from_millis(1));
    assert_eq!(watchdog.run_due_timers(), 1);
    assert!(watchdog.state(TAG).is_none());

    watchdog.guard(Some(TAG)).unwrap();
    assert_eq!(watchdog.state(TAG).unwrap().count, 1);
}

#[test]
fn stale_idle_timers_are_ignored() {
    let (mut watchdog, _) = watchdog(WatchdogConfig::default());

    watchdog.guard(Some(TAG)).unwrap();
    let stale = watchdog.state(TAG).unwrap().pending_reset.unwrap();
    watchdog.guard(Some(TAG)).unwrap();

    watchdog.fire_idle_reset(TAG, stale);
    assert_eq!(watchdog.state(TAG).unwrap().count, 2);
}

#[test]
fn disabled_watchdog_does_nothing() {
    let (mut watchdog, _) = watchdog(WatchdogConfig { max_iterations: 1, ..WatchdogConfig::disabled() });

    for _ in 0..1_000_000 {
        assert!(watchdog.guard(Some(TAG)).is_ok());
    }
    assert!(watchdog.is_empty());
    assert!(watchdog.scheduler().is_empty());
}

#[test]
fn reset_all_clears_state() {
    let (mut watchdog, _) = watchdog(with_iterations(5));

    for _ in 0..4 {
        watchdog.guard(Some(TAG)).unwrap();
        watchdog.guard(Some("other")).unwrap();
    }
    assert_eq!(watchdog.len(), 2);

    watchdog.reset_all();
    assert!(watchdog.is_empty());
    assert!(watchdog.scheduler().is_empty());

    for _ in 0..5 {
        watchdog.guard(Some(TAG)).unwrap();
    }
    assert!(watchdog.guard(Some(TAG)).is_err());
}

#[test]
fn missing_tags_share_a_key() {
    let (mut watchdog, _) = watchdog(with_iterations(2));

    watchdog.guard(None).unwrap();
    watchdog.guard(Some("")).unwrap();
    let error = watchdog.guard(None).unwrap_err();

    assert_eq!(error.tag, tags::DEFAULT_TAG);
    assert!(error.message.contains("the loop at an unknown line"));
}

#[test]
fn tags_are_tracked_separately() {
    let (mut watchdog, _) = watchdog(with_iterations(3));

    for _ in 0..3 {
        watchdog.guard(Some("a@ForStatement@1:0")).unwrap();
        watchdog.guard(Some("a@ForStatement@2:0")).unwrap();
    }
    assert_eq!(watchdog.len(), 2);
    assert!(watchdog.guard(Some("a@ForStatement@2:0")).is_err());
    assert_eq!(watchdog.len(), 1);
}

mod callbacks {
    use super::*;

    #[test]
    fn receives_tag_and_message() {
        let (mut watchdog, _) = watchdog(with_iterations(1));
        let calls = Rc::new(RefCell::new(vec![]));

        let recorded = Rc::clone(&calls);
        watchdog.on_trip(move |tag, message| {
            recorded.borrow_mut().push((tag.to_string(), message.to_string()));
            Ok(())
        });

        watchdog.guard(Some(TAG)).unwrap();
        let error = watchdog.guard(Some(TAG)).unwrap_err();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, TAG);
        assert_eq!(calls[0].1, error.message);
    }

    #[test]
    fn errors_are_swallowed() {
        let (mut watchdog, _) = watchdog(with_iterations(1));
        watchdog.on_trip(|_, _| Err(TripCallbackError::new("host went away")));

        watchdog.guard(Some(TAG)).unwrap();
        let error = watchdog.guard(Some(TAG)).unwrap_err();
        assert_eq!(error.reason, TripReason::Iterations { count: 2, limit: 1 });
    }

    #[test]
    fn panics_are_swallowed() {
        let (mut watchdog, _) = watchdog(with_iterations(1));
        watchdog.on_trip(|_, _| panic!("callback panicked"));

        watchdog.guard(Some(TAG)).unwrap();
        assert!(watchdog.guard(Some(TAG)).is_err());
        assert!(watchdog.guard(Some(TAG)).is_ok());
    }
}

#[test]
fn huge_idle_reset_saturates() {
    let config = WatchdogConfig::from_json(r#"{ "idleResetMs": 1.8446744073e22 }"#).unwrap();
    assert!(config.idle_reset > Duration::from_secs(1 << 60));

    let (mut watchdog, clock) = watchdog(config);
    clock.advance(Duration::from_secs(1_000_000_000));
    watchdog.guard(Some(TAG)).unwrap();
    watchdog.guard(Some(TAG)).unwrap();

    assert_eq!(watchdog.state(TAG).unwrap().count, 2);
    assert_eq!(watchdog.scheduler().next_deadline(), Some(Duration::MAX));
    assert_eq!(watchdog.run_due_timers(), 0);
}

#[test]
fn custom_scheduler() {
    #[derive(Default)]
    struct Recording {
        next: u64,
        scheduled: Vec<(String, Duration, TimerHandle)>,
        cancelled: Vec<TimerHandle>,
    }

    impl Scheduler for Recording {
        fn schedule(&mut self, key: &str, deadline: Duration) -> TimerHandle {
            let handle = TimerHandle::new(self.next);
            self.next += 1;
            self.scheduled.push((key.to_string(), deadline, handle));
            handle
        }

        fn cancel(&mut self, handle: TimerHandle) {
            self.cancelled.push(handle);
        }
    }

    let clock = ManualClock::new();
    let mut watchdog = Watchdog::new(WatchdogConfig::default(), clock.clone(), Recording::default());

    watchdog.guard(Some(TAG)).unwrap();
    clock.advance(Duration::from_millis(1));
    watchdog.guard(Some(TAG)).unwrap();

    let recording = watchdog.scheduler();
    let [(first_key, first_deadline, first), (second_key, second_deadline, second)] =
        recording.scheduled.as_slice()
    else {
        panic!("expected two timers, got {:?}", recording.scheduled);
    };
    let (first, second) = (*first, *second);
    assert_eq!((first_key.as_str(), *first_deadline), (TAG, Duration::from_millis(5)));
    assert_eq!((second_key.as_str(), *second_deadline), (TAG, Duration::from_millis(6)));
    assert_ne!(first, second);
    assert_eq!(first.get(), 0);
    assert_eq!(recording.cancelled, [first]);

    // The host delivers the cancelled timer anyway.
    watchdog.fire_idle_reset(TAG, first);
    assert_eq!(watchdog.state(TAG).unwrap().count, 2);

    watchdog.fire_idle_reset(TAG, second);
    assert!(watchdog.state(TAG).is_none());
}
