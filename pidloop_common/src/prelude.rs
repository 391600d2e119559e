//! Prelude module for common re-exports.
//!
//! ```rust
//! use pidloop_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::controller::config::ControllerConfig;

// ─── Controller ─────────────────────────────────────────────────────
pub use crate::consts::{DEFAULT_OUTPUT_MAX, DEFAULT_OUTPUT_MIN, DEFAULT_SAMPLE_TIME_MS};
pub use crate::controller::error::ControllerError;
pub use crate::controller::mode::{Direction, Mode};
