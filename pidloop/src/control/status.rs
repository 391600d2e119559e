//! Serializable controller status.

use pidloop_common::controller::mode::{Direction, Mode};
use serde::Serialize;

/// Point-in-time view of a controller, as shown on a status display.
///
/// Gains are reported unscaled, exactly as they were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub input: f64,
    pub setpoint: f64,
    pub output: f64,
    pub integral: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub mode: Mode,
    pub direction: Direction,
    pub sample_time_ms: u32,
    pub output_min: f64,
    pub output_max: f64,
}

impl ControllerSnapshot {
    /// Single-line JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
