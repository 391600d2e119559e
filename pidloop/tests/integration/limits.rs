//! Output clamping, limit changes and anti-windup.

use pidloop::clock::ManualClock;
use pidloop::control::pid::{PidController, Tunings};
use pidloop_common::prelude::*;

fn automatic(
    clock: &ManualClock,
    input: f64,
    setpoint: f64,
    tunings: Tunings,
    limits: (f64, f64),
) -> PidController<&ManualClock> {
    let mut pid =
        PidController::with_clock(clock, input, setpoint, tunings, Direction::Direct).unwrap();
    pid.set_output_limits(limits.0, limits.1).unwrap();
    pid.set_mode(Mode::Automatic).unwrap();
    pid
}

fn assert_within(pid: &PidController<&ManualClock>) {
    let (min, max) = pid.output_limits();
    assert!(
        (min..=max).contains(&pid.output()),
        "output {} outside [{min}, {max}]",
        pid.output()
    );
    assert!(
        (min..=max).contains(&pid.integral()),
        "integral {} outside [{min}, {max}]",
        pid.integral()
    );
}

#[test]
fn concrete_scenario_saturates_high() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(
        &clock,
        50.0,
        66.0,
        Tunings::new(10.0, 2.0, 1.0),
        (0.0, 100.0),
    );
    clock.advance(100);
    assert!(pid.compute());
    // 10 × 16 + 0.2 × 16 = 163.2 → 100; integral 3.2 − 63.2 held at 0.
    assert_eq!(pid.output(), 100.0);
    assert_eq!(pid.integral(), 0.0);
}

#[test]
fn output_stays_in_window_across_random_walk() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(
        &clock,
        0.0,
        0.0,
        Tunings::new(3.0, 4.0, 0.2),
        (-20.0, 20.0),
    );

    for k in 0..2_000 {
        let t = k as f64 * 0.37;
        pid.set_input(40.0 * t.sin() + 5.0 * (3.1 * t).cos());
        pid.set_setpoint(30.0 * (0.2 * t).sin());
        if k % 250 == 0 {
            let half = 5.0 + (k / 250) as f64 * 3.0;
            pid.set_output_limits(-half, half).unwrap();
        }
        clock.advance(100);
        assert!(pid.compute());
        assert_within(&pid);
    }
}

#[test]
fn sustained_saturation_does_not_wind_up() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(&clock, 0.0, 10.0, Tunings::new(0.0, 10.0, 0.0), (0.0, 5.0));

    for _ in 0..500 {
        clock.advance(100);
        assert!(pid.compute());
        assert_eq!(pid.output(), 5.0);
        assert_within(&pid);
    }
    assert_eq!(pid.integral(), 5.0);

    // Error reverses: the output leaves saturation on the very next sample.
    pid.set_input(11.0);
    clock.advance(100);
    assert!(pid.compute());
    assert!(pid.output() < 5.0, "output {}", pid.output());
}

#[test]
fn proportional_saturation_keeps_integral_bounded() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(&clock, 0.0, 1_000.0, Tunings::new(1.0, 1.0, 0.0), (0.0, 100.0));

    for _ in 0..100 {
        clock.advance(100);
        assert!(pid.compute());
        assert_eq!(pid.output(), 100.0);
        assert_within(&pid);
    }

    pid.set_setpoint(0.0);
    clock.advance(100);
    assert!(pid.compute());
    assert!(pid.output() < 100.0);
}

#[test]
fn inverted_limits_are_rejected() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(&clock, 0.0, 0.0, Tunings::new(1.0, 0.0, 0.0), (0.0, 100.0));

    assert_eq!(
        pid.set_output_limits(50.0, 10.0),
        Err(ControllerError::InvalidOutputLimits {
            min: 50.0,
            max: 10.0
        })
    );
    assert!(pid.set_output_limits(10.0, 10.0).is_err());
    assert!(pid.set_output_limits(f64::NAN, 10.0).is_err());
    assert_eq!(pid.output_limits(), (0.0, 100.0));
}

#[test]
fn shrinking_window_pulls_state_inside() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(
        &clock,
        50.0,
        66.0,
        Tunings::new(10.0, 2.0, 1.0),
        (0.0, 100.0),
    );
    assert!(pid.compute());
    assert_eq!(pid.output(), 100.0);

    pid.set_output_limits(20.0, 60.0).unwrap();
    assert_eq!(pid.output(), 60.0);
    assert_eq!(pid.integral(), 20.0);
}

#[test]
fn set_output_above_window_is_kept_verbatim() {
    let clock = ManualClock::new(0);
    let mut pid =
        PidController::with_clock(&clock, 0.0, 0.0, Tunings::new(1.0, 0.0, 0.0), Direction::Direct)
            .unwrap();
    pid.set_output_limits(0.0, 100.0).unwrap();
    pid.set_output(250.0);
    assert_eq!(pid.output(), 250.0);
    pid.set_output(-1.0);
    assert_eq!(pid.output(), 0.0);
}

#[test]
fn non_finite_measurement_is_skipped_and_loop_recovers() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(
        &clock,
        50.0,
        60.0,
        Tunings::new(2.0, 1.0, 0.5),
        (0.0, 100.0),
    );
    clock.advance(100);
    assert!(pid.compute());
    let (output, integral) = (pid.output(), pid.integral());

    pid.set_input(f64::NAN);
    clock.advance(100);
    assert!(!pid.compute());
    assert_eq!(pid.output(), output);
    assert_eq!(pid.integral(), integral);
    assert_within(&pid);

    pid.set_input(f64::INFINITY);
    assert!(!pid.compute());
    assert_within(&pid);

    for step in 0..5 {
        pid.set_input(52.0 + f64::from(step));
        clock.advance(100);
        assert!(pid.compute());
        assert!(pid.output().is_finite());
        assert_within(&pid);
    }
}

#[test]
fn infinite_gain_never_reaches_the_output() {
    let clock = ManualClock::new(0);
    let mut pid = automatic(&clock, 66.0, 66.0, Tunings::new(1.0, 0.0, 0.0), (0.0, 100.0));
    assert!(pid.set_tunings(f64::INFINITY, 0.0, 0.0).is_err());
    clock.advance(100);
    assert!(pid.compute());
    assert_eq!(pid.output(), 0.0);
    assert_within(&pid);
}
