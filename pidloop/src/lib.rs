//! # pidloop
//!
//! Discrete-time PID controller meant to sit inside a host-owned polling
//! loop. The host pushes measurements and calls `compute` on every
//! iteration; the controller recomputes only when its sample interval has
//! elapsed on an injected [`clock::Clock`].
//!
//! ## Features
//!
//! - Rate gate on a millisecond clock (system or synthetic)
//! - Derivative on measurement (no setpoint kick)
//! - Output clamping with back-calculation anti-windup
//! - Gains rescaled on sample-time changes
//! - Bumpless manual → automatic transfer
//!
//! ```rust
//! use pidloop::clock::ManualClock;
//! use pidloop::control::pid::{PidController, Tunings};
//! use pidloop_common::prelude::*;
//!
//! let clock = ManualClock::new(0);
//! let mut pid = PidController::with_clock(
//!     &clock, 50.0, 66.0, Tunings::new(10.0, 2.0, 1.0), Direction::Direct,
//! )?;
//! pid.set_output_limits(0.0, 100.0)?;
//! pid.set_mode("auto")?;
//! assert!(pid.compute());
//! assert_eq!(pid.output(), 100.0);
//! # Ok::<(), ControllerError>(())
//! ```

pub mod clock;
pub mod config;
pub mod control;
pub mod cycle;
