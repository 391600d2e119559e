//! Controller-wide constants.
//!
//! Single source of truth for defaults applied at construction and by the
//! configuration layer.

use static_assertions::const_assert;

/// Default minimum time between two recomputations [ms].
pub const DEFAULT_SAMPLE_TIME_MS: u32 = 100;

/// Default lower output bound.
pub const DEFAULT_OUTPUT_MIN: f64 = 0.0;

/// Default upper output bound.
pub const DEFAULT_OUTPUT_MAX: f64 = 255.0;

/// Milliseconds per second, used when scaling gains to the sample period.
pub const MS_PER_SECOND: f64 = 1000.0;

const_assert!(DEFAULT_SAMPLE_TIME_MS > 0);
