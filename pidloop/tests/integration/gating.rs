//! Rate gate and manual-mode behaviour.

use pidloop::clock::ManualClock;
use pidloop::control::pid::{PidController, Tunings};
use pidloop_common::prelude::*;

fn automatic(clock: &ManualClock, sample_ms: f64) -> PidController<&ManualClock> {
    let mut pid = PidController::with_clock(
        clock,
        50.0,
        66.0,
        Tunings::new(10.0, 2.0, 1.0),
        Direction::Direct,
    )
    .unwrap();
    pid.set_sample_time(sample_ms).unwrap();
    pid.set_mode(Mode::Automatic).unwrap();
    pid
}

#[test]
fn second_compute_within_interval_is_gated() {
    for interval in [1.0, 50.0, 100.0, 250.0, 1_000.0] {
        let clock = ManualClock::new(10_000);
        let mut pid = automatic(&clock, interval);
        clock.advance(interval as u64);
        assert!(pid.compute(), "interval {interval}");
        clock.advance(interval as u64 - 1);
        assert!(!pid.compute(), "interval {interval}");
        clock.advance(1);
        assert!(pid.compute(), "interval {interval}");
    }
}

#[test]
fn gate_measures_from_last_accepted_compute() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(&clock, 100.0);
    assert!(pid.compute());
    for _ in 0..9 {
        clock.advance(10);
        assert!(!pid.compute());
    }
    clock.advance(10);
    assert!(pid.compute());
}

#[test]
fn late_compute_fires_once() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(&clock, 100.0);
    assert!(pid.compute());
    clock.advance(1_000);
    assert!(pid.compute());
    assert!(!pid.compute());
}

#[test]
fn manual_mode_never_computes_or_mutates() {
    let clock = ManualClock::new(0);
    let mut pid = PidController::with_clock(
        &clock,
        50.0,
        66.0,
        Tunings::new(10.0, 2.0, 1.0),
        Direction::Direct,
    )
    .unwrap();
    pid.set_output(12.0);
    let before = pid.snapshot();

    for i in 0..50 {
        pid.set_input(50.0 + i as f64);
        pid.set_setpoint(66.0 - i as f64);
        clock.advance(250);
        assert!(!pid.compute());
        assert_eq!(pid.output(), before.output);
        assert_eq!(pid.integral(), before.integral);
    }
}

#[test]
fn leaving_automatic_freezes_output() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(&clock, 100.0);
    assert!(pid.compute());
    let output = pid.output();
    let integral = pid.integral();

    pid.set_mode("manual").unwrap();
    pid.set_input(0.0);
    clock.advance(500);
    assert!(!pid.compute());
    assert_eq!(pid.output(), output);
    assert_eq!(pid.integral(), integral);
    assert_eq!(pid.mode_label(), "Manual");
}
