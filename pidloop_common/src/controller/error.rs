//! Controller error taxonomy.
//!
//! `InvalidMode` and `InvalidDirection` abort the call that produced them.
//! The remaining variants report a rejected configuration value; the
//! controller keeps its previous configuration in that case.

use std::convert::Infallible;

use thiserror::Error;

/// Error returned by controller mutators and boundary parsers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    /// Mode request matched none of the accepted encodings.
    #[error("incorrect mode chosen: {0:?}")]
    InvalidMode(String),

    /// Direction request matched none of the accepted encodings.
    #[error("incorrect controller direction chosen: {0:?}")]
    InvalidDirection(String),

    /// At least one gain was negative or NaN.
    #[error("tunings must be non-negative (kp={kp}, ki={ki}, kd={kd})")]
    NegativeTuning { kp: f64, ki: f64, kd: f64 },

    /// Sample interval does not round to a positive number of milliseconds.
    #[error("sample time must be a positive number of milliseconds, got {0}")]
    InvalidSampleTime(f64),

    /// Lower output bound is not strictly below the upper bound.
    #[error("output limits require min < max (min={min}, max={max})")]
    InvalidOutputLimits { min: f64, max: f64 },
}

impl From<Infallible> for ControllerError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
