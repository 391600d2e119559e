//! Rate-gated PID controller with back-calculation anti-windup and
//! bumpless manual → automatic transfer.
//!
//! The controller never schedules itself. The host pushes measurements with
//! [`PidController::set_input`] and calls [`PidController::compute`] on every
//! loop iteration; `compute` recomputes only once the sample interval has
//! elapsed on the injected [`Clock`].
//!
//! Gains are stored twice: as supplied (reported by [`PidController::kp`] and
//! friends) and scaled to the sample period, so the control law itself never
//! divides by time.

use pidloop_common::consts::{
    DEFAULT_OUTPUT_MAX, DEFAULT_OUTPUT_MIN, DEFAULT_SAMPLE_TIME_MS, MS_PER_SECOND,
};
use pidloop_common::controller::error::ControllerError;
use pidloop_common::controller::mode::{Direction, Mode};
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};

use super::status::ControllerSnapshot;

/// Unscaled PID gains, as a caller supplies them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunings {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain [1/s].
    pub ki: f64,
    /// Derivative gain [s].
    pub kd: f64,
}

impl Tunings {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// True when every gain is finite and non-negative.
    #[inline]
    pub fn is_valid(&self) -> bool {
        [self.kp, self.ki, self.kd]
            .iter()
            .all(|g| g.is_finite() && *g >= 0.0)
    }
}

/// Discrete-time PID controller.
///
/// One instance per control loop. Not internally synchronised: a host that
/// shares it between threads must serialise access itself.
#[derive(Debug, Clone)]
pub struct PidController<C: Clock = SystemClock> {
    clock: C,

    input: f64,
    setpoint: f64,
    output: f64,

    /// Integral accumulator, in output units.
    integral: f64,
    /// Measurement at the previous computed step.
    last_input: f64,

    /// Gains scaled to the sample period.
    kp: f64,
    ki: f64,
    kd: f64,
    /// Gains as supplied.
    display: Tunings,

    out_min: f64,
    out_max: f64,

    sample_time_ms: u32,
    last_compute_ms: i64,

    mode: Mode,
    direction: Direction,
}

impl PidController<SystemClock> {
    /// Create a controller timed by the system clock.
    pub fn new(
        input: f64,
        setpoint: f64,
        tunings: Tunings,
        direction: Direction,
    ) -> Result<Self, ControllerError> {
        Self::with_clock(SystemClock::new(), input, setpoint, tunings, direction)
    }
}

impl<C: Clock> PidController<C> {
    /// Create a controller timed by `clock`.
    ///
    /// Starts in [`Mode::Manual`] with output `0`, limits `[0, 255]` and a
    /// 100 ms sample interval. The rate gate is primed so the first automatic
    /// `compute` fires immediately.
    ///
    /// # Errors
    ///
    /// [`ControllerError::NegativeTuning`] if any gain is negative or not finite.
    pub fn with_clock(
        clock: C,
        input: f64,
        setpoint: f64,
        tunings: Tunings,
        direction: Direction,
    ) -> Result<Self, ControllerError> {
        if !tunings.is_valid() {
            return Err(ControllerError::NegativeTuning {
                kp: tunings.kp,
                ki: tunings.ki,
                kd: tunings.kd,
            });
        }

        let now = timestamp(&clock);
        let mut pid = Self {
            clock,
            input,
            setpoint,
            output: 0.0,
            integral: 0.0,
            last_input: input,
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            display: tunings,
            out_min: DEFAULT_OUTPUT_MIN,
            out_max: DEFAULT_OUTPUT_MAX,
            sample_time_ms: DEFAULT_SAMPLE_TIME_MS,
            last_compute_ms: now - i64::from(DEFAULT_SAMPLE_TIME_MS),
            mode: Mode::Manual,
            direction,
        };
        pid.apply_tunings(tunings);
        Ok(pid)
    }

    // ─── Compute ────────────────────────────────────────────────────

    /// Run the control law if the controller is automatic and a full sample
    /// interval has elapsed since the last computation.
    ///
    /// Returns `true` when a new output was produced.
    pub fn compute(&mut self) -> bool {
        if self.mode == Mode::Manual {
            return false;
        }

        let now = timestamp(&self.clock);
        if now.saturating_sub(self.last_compute_ms) < i64::from(self.sample_time_ms) {
            return false;
        }

        let sign = self.direction.sign();
        let input = self.input;
        let error = self.setpoint - input;

        // ── I term ──────────────────────────────────────────────
        let mut integral = self.integral + sign * self.ki * error;

        // ── D term on measurement ───────────────────────────────
        // A setpoint step leaves d_input untouched, so it causes no kick.
        let d_input = input - self.last_input;

        let mut output = sign * (self.kp * error - self.kd * d_input) + integral;

        // Non-finite sample: keep the previous state and wait for the next one.
        if !(error.is_finite() && d_input.is_finite() && output.is_finite()) {
            warn!(input, setpoint = self.setpoint, "skipped non-finite sample");
            return false;
        }

        // ── Saturation with back-calculation ────────────────────
        if output > self.out_max {
            integral -= output - self.out_max;
            output = self.out_max;
        } else if output < self.out_min {
            integral += self.out_min - output;
            output = self.out_min;
        }
        self.integral = integral.clamp(self.out_min, self.out_max);

        self.output = output;
        self.last_input = input;
        self.last_compute_ms = now;

        trace!(
            now,
            error,
            integral = self.integral,
            output,
            "pid recomputed"
        );
        true
    }

    // ─── Configuration ──────────────────────────────────────────────

    /// Latest process measurement.
    #[inline]
    pub fn set_input(&mut self, value: f64) {
        self.input = value;
    }

    /// Target value.
    #[inline]
    pub fn set_setpoint(&mut self, value: f64) {
        self.setpoint = value;
    }

    /// Replace the gains. Scaled gains follow the current sample interval.
    ///
    /// Leaves the integral accumulator and output alone, so retuning a running
    /// loop does not bump the output.
    ///
    /// # Errors
    ///
    /// [`ControllerError::NegativeTuning`] if any gain is negative or not finite; the
    /// previous gains stay in effect.
    pub fn set_tunings(&mut self, kp: f64, ki: f64, kd: f64) -> Result<(), ControllerError> {
        let tunings = Tunings::new(kp, ki, kd);
        if !tunings.is_valid() {
            warn!(kp, ki, kd, "rejected tunings");
            return Err(ControllerError::NegativeTuning { kp, ki, kd });
        }
        self.apply_tunings(tunings);
        Ok(())
    }

    /// Change the sample interval [ms], rounded to whole milliseconds.
    ///
    /// Scaled `ki`/`kd` are rescaled by the interval ratio, which keeps the
    /// per-second behaviour of the loop unchanged.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidSampleTime`] unless the rounded interval is a
    /// positive number of milliseconds representable as `u32`.
    pub fn set_sample_time(&mut self, interval_ms: f64) -> Result<(), ControllerError> {
        let rounded = interval_ms.round();
        if !(rounded >= 1.0 && rounded <= f64::from(u32::MAX)) {
            warn!(interval_ms, "rejected sample time");
            return Err(ControllerError::InvalidSampleTime(interval_ms));
        }

        let ratio = rounded / f64::from(self.sample_time_ms);
        self.ki *= ratio;
        self.kd /= ratio;
        self.sample_time_ms = rounded as u32;
        Ok(())
    }

    /// Set the output window.
    ///
    /// In automatic mode the current output and integral are pulled into the
    /// new window immediately.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidOutputLimits`] unless both bounds are finite
    /// and `min < max`; the old window stays in effect.
    pub fn set_output_limits(&mut self, min: f64, max: f64) -> Result<(), ControllerError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            warn!(min, max, "rejected output limits");
            return Err(ControllerError::InvalidOutputLimits { min, max });
        }
        self.out_min = min;
        self.out_max = max;

        if self.mode == Mode::Automatic {
            self.output = self.output.clamp(min, max);
            self.integral = self.integral.clamp(min, max);
        }
        Ok(())
    }

    /// Override the output, intended for manual mode.
    ///
    /// Values below the window are raised to `out_min`. Values above it are
    /// stored as given. NaN is ignored.
    pub fn set_output(&mut self, value: f64) {
        if value.is_nan() {
            warn!("ignored NaN manual output");
            return;
        }
        self.output = if value < self.out_min {
            self.out_min
        } else {
            value
        };
    }

    /// Switch between manual and automatic.
    ///
    /// Accepts a [`Mode`] or any of its loose encodings (`"auto"`, `1`, ...).
    /// Entering automatic from manual seeds the integral with the current
    /// output so the first computed output continues from it.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidMode`] for unrecognised requests; nothing
    /// is changed.
    pub fn set_mode<M>(&mut self, mode: M) -> Result<(), ControllerError>
    where
        M: TryInto<Mode>,
        ControllerError: From<M::Error>,
    {
        let mode = mode.try_into()?;
        if mode == Mode::Automatic && self.mode == Mode::Manual {
            self.initialize();
        }
        if mode != self.mode {
            debug!(from = %self.mode, to = %mode, "mode change");
        }
        self.mode = mode;
        Ok(())
    }

    /// Set the acting direction.
    ///
    /// Accepts a [`Direction`] or one of its loose encodings (`"reverse"`, `1`,
    /// ...).
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidDirection`] for unrecognised requests.
    pub fn set_direction<D>(&mut self, direction: D) -> Result<(), ControllerError>
    where
        D: TryInto<Direction>,
        ControllerError: From<D::Error>,
    {
        self.direction = direction.try_into()?;
        Ok(())
    }

    // ─── Status ─────────────────────────────────────────────────────

    /// Proportional gain as supplied.
    #[inline]
    pub fn kp(&self) -> f64 {
        self.display.kp
    }

    /// Integral gain as supplied.
    #[inline]
    pub fn ki(&self) -> f64 {
        self.display.ki
    }

    /// Derivative gain as supplied.
    #[inline]
    pub fn kd(&self) -> f64 {
        self.display.kd
    }

    /// All three gains as supplied.
    #[inline]
    pub fn tunings(&self) -> Tunings {
        self.display
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// `"Auto"` or `"Manual"`.
    #[inline]
    pub fn mode_label(&self) -> &'static str {
        self.mode.label()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn output(&self) -> f64 {
        self.output
    }

    #[inline]
    pub fn input(&self) -> f64 {
        self.input
    }

    #[inline]
    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    #[inline]
    pub fn sample_time_ms(&self) -> u32 {
        self.sample_time_ms
    }

    /// `(min, max)` output window.
    #[inline]
    pub fn output_limits(&self) -> (f64, f64) {
        (self.out_min, self.out_max)
    }

    /// Integral accumulator, in output units.
    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Clock driving the rate gate.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Everything a status display needs, in one serializable value.
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            input: self.input,
            setpoint: self.setpoint,
            output: self.output,
            integral: self.integral,
            kp: self.display.kp,
            ki: self.display.ki,
            kd: self.display.kd,
            mode: self.mode,
            direction: self.direction,
            sample_time_ms: self.sample_time_ms,
            output_min: self.out_min,
            output_max: self.out_max,
        }
    }

    // ─── Internals ──────────────────────────────────────────────────

    fn apply_tunings(&mut self, tunings: Tunings) {
        let sample_time_s = f64::from(self.sample_time_ms) / MS_PER_SECOND;
        self.display = tunings;
        self.kp = tunings.kp;
        self.ki = tunings.ki * sample_time_s;
        self.kd = tunings.kd / sample_time_s;
    }

    /// Bumpless transfer: continue from the manual output.
    fn initialize(&mut self) {
        self.integral = self.output.clamp(self.out_min, self.out_max);
        self.last_input = self.input;
    }
}

#[inline]
fn timestamp<C: Clock>(clock: &C) -> i64 {
    i64::try_from(clock.now_ms()).unwrap_or(i64::MAX)
}

// ─── Tests ──────────────────────────────────────────────────────────
