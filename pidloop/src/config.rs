//! Loop configuration loader with validation.
//!
//! A loop file holds the shared logging section, one `[controller]` table and
//! an optional `[simulation]` table consumed by the host harness.

use std::path::Path;

use pidloop_common::config::{ConfigError, ConfigLoader, SharedConfig};
use pidloop_common::controller::config::ControllerConfig;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::control::pid::{PidController, Tunings};

// ─── Loop Config ────────────────────────────────────────────────────

/// Complete loop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    pub shared: SharedConfig,
    pub controller: ControllerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.controller.validate()?;
        self.simulation.validate()
    }
}

/// Simulated process used by the host harness.
///
/// The measurement creeps up by `step` every `input_interval_ms` until it
/// reaches `ceiling`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default = "default_input_interval_ms")]
    pub input_interval_ms: u64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
}

fn default_input_interval_ms() -> u64 {
    700
}
fn default_step() -> f64 {
    0.1
}
fn default_ceiling() -> f64 {
    69.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            input_interval_ms: default_input_interval_ms(),
            step: default_step(),
            ceiling: default_ceiling(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.input_interval_ms must be > 0".to_string(),
            ));
        }
        if !self.step.is_finite() || !self.ceiling.is_finite() {
            return Err(ConfigError::ValidationError(
                "simulation.step and simulation.ceiling must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate a loop configuration file.
pub fn load_config(path: &Path) -> Result<LoopConfig, ConfigError> {
    let config = LoopConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a loop configuration from a TOML string.
pub fn load_config_from_str(content: &str) -> Result<LoopConfig, ConfigError> {
    let config = LoopConfig::from_toml(content)?;
    config.validate()?;
    Ok(config)
}

/// Build a controller from its configuration.
///
/// Applies limits, sample time and any initial manual output before the
/// configured mode, so entering automatic here is a bumpless transfer from
/// `initial_output`.
pub fn build_controller<C: Clock>(
    config: &ControllerConfig,
    clock: C,
) -> Result<PidController<C>, ConfigError> {
    let mut pid = PidController::with_clock(
        clock,
        config.input,
        config.setpoint,
        Tunings::new(config.kp, config.ki, config.kd),
        config.direction,
    )?;
    pid.set_output_limits(config.output_min, config.output_max)?;
    pid.set_sample_time(f64::from(config.sample_time_ms))?;
    if let Some(output) = config.initial_output {
        pid.set_output(output);
    }
    pid.set_mode(config.mode)?;
    Ok(pid)
}
