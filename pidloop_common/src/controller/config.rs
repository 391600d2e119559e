//! Controller configuration.
//!
//! Deserialized from the `[controller]` table of a loop TOML file. Optional
//! fields fall back to the constants in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{DEFAULT_OUTPUT_MAX, DEFAULT_OUTPUT_MIN, DEFAULT_SAMPLE_TIME_MS};

use super::mode::{Direction, Mode};

/// Construction parameters and initial operating point of one controller.
///
/// # TOML Example
///
/// ```toml
/// [controller]
/// input = 50.0
/// setpoint = 66.0
/// kp = 10.0
/// ki = 2.0
/// kd = 1.0
/// direction = "direct"
/// mode = "auto"
/// output_max = 100.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Initial process measurement.
    #[serde(default)]
    pub input: f64,
    /// Target value.
    pub setpoint: f64,
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain [1/s].
    pub ki: f64,
    /// Derivative gain [s].
    pub kd: f64,
    /// Acting direction of the process.
    #[serde(default)]
    pub direction: Direction,
    /// Mode entered right after construction.
    #[serde(default)]
    pub mode: Mode,
    /// Minimum time between recomputations [ms].
    #[serde(default = "default_sample_time_ms")]
    pub sample_time_ms: u32,
    /// Lower output bound.
    #[serde(default = "default_output_min")]
    pub output_min: f64,
    /// Upper output bound.
    #[serde(default = "default_output_max")]
    pub output_max: f64,
    /// Manual output applied before the initial mode, seeding bumpless transfer.
    #[serde(default)]
    pub initial_output: Option<f64>,
}

fn default_sample_time_ms() -> u32 {
    DEFAULT_SAMPLE_TIME_MS
}
fn default_output_min() -> f64 {
    DEFAULT_OUTPUT_MIN
}
fn default_output_max() -> f64 {
    DEFAULT_OUTPUT_MAX
}

impl ControllerConfig {
    /// Config with the given operating point and gains; everything else default.
    pub fn new(input: f64, setpoint: f64, kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            input,
            setpoint,
            kp,
            ki,
            kd,
            direction: Direction::default(),
            mode: Mode::default(),
            sample_time_ms: DEFAULT_SAMPLE_TIME_MS,
            output_min: DEFAULT_OUTPUT_MIN,
            output_max: DEFAULT_OUTPUT_MAX,
            initial_output: None,
        }
    }

    /// Validate parameter bounds.
    ///
    /// Mirrors the checks the controller applies at runtime, so a config that
    /// passes here is accepted without any silent no-op.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, gain) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !(gain >= 0.0 && gain.is_finite()) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a finite non-negative number, got {gain}"
                )));
            }
        }
        if self.sample_time_ms == 0 {
            return Err(ConfigError::ValidationError(
                "sample_time_ms must be > 0".to_string(),
            ));
        }
        if !(self.output_min.is_finite()
            && self.output_max.is_finite()
            && self.output_min < self.output_max)
        {
            return Err(ConfigError::ValidationError(format!(
                "output_min {} must be finite and below a finite output_max {}",
                self.output_min, self.output_max
            )));
        }
        Ok(())
    }
}
