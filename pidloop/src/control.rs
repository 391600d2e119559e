//! Control engine root.
//!
//! A single rate-gated PID stage plus the status view hosts read back.

pub mod pid;
pub mod status;
