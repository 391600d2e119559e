//! Controller shared types.
//!
//! Everything a host needs to talk to a controller without depending on the
//! control law itself: operating mode and acting direction with their
//! boundary parsing, the error taxonomy, and the serde-backed configuration.

pub mod config;
pub mod error;
pub mod mode;
