//! Manual → automatic transfer.

use pidloop::clock::ManualClock;
use pidloop::control::pid::{PidController, Tunings};
use pidloop_common::prelude::*;

fn manual(clock: &ManualClock) -> PidController<&ManualClock> {
    let mut pid = PidController::with_clock(
        clock,
        50.0,
        50.0,
        Tunings::new(2.0, 1.0, 0.5),
        Direction::Direct,
    )
    .unwrap();
    pid.set_output_limits(0.0, 100.0).unwrap();
    pid
}

#[test]
fn integral_inherits_manual_output() {
    let clock = ManualClock::new(0);
    let mut pid = manual(&clock);
    pid.set_output(42.0);
    pid.set_mode("auto").unwrap();
    assert_eq!(pid.integral(), 42.0);
    assert_eq!(pid.mode(), Mode::Automatic);
}

#[test]
fn first_output_continues_from_manual_value() {
    let clock = ManualClock::new(0);
    let mut pid = manual(&clock);
    pid.set_output(42.0);
    pid.set_mode(1).unwrap();
    // At setpoint with a steady measurement every term but the integral is zero.
    assert!(pid.compute());
    assert_eq!(pid.output(), 42.0);
}

#[test]
fn measurement_jump_before_transfer_causes_no_derivative_kick() {
    let clock = ManualClock::new(0);
    let mut pid = manual(&clock);
    pid.set_output(42.0);
    pid.set_input(80.0);
    pid.set_setpoint(80.0);
    pid.set_mode(Mode::Automatic).unwrap();
    assert!(pid.compute());
    assert_eq!(pid.output(), 42.0);
}

#[test]
fn low_manual_output_is_raised_before_seeding() {
    let clock = ManualClock::new(0);
    let mut pid = manual(&clock);
    pid.set_output_limits(10.0, 100.0).unwrap();
    pid.set_output(-5.0);
    pid.set_mode("Automatic").unwrap();
    assert_eq!(pid.integral(), 10.0);
}

#[test]
fn unknown_mode_is_reported_and_ignored() {
    let clock = ManualClock::new(0);
    let mut pid = manual(&clock);
    pid.set_output(42.0);
    let err = pid.set_mode("autom").unwrap_err();
    assert_eq!(err, ControllerError::InvalidMode("autom".to_string()));
    assert_eq!(pid.mode(), Mode::Manual);
    assert_eq!(pid.integral(), 0.0);
}
