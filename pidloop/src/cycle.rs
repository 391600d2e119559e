//! Host polling loop: feed → compute → report.
//!
//! The controller never owns its schedule. [`LoopRunner`] plays the external
//! caller: on every tick it pushes a fresh measurement when one is due, calls
//! `compute`, and logs a status line whenever a new output was produced.
//!
//! The measurement comes from [`RampingProcess`], a stand-in plant that
//! creeps toward a ceiling at a fixed rate regardless of the output.
//!
//! ## Tick
//! 1. Input due (`now >= next_input_ms`) → advance the process, `set_input`.
//! 2. `compute()` (self-gated on the sample interval).
//! 3. Output produced → status snapshot at INFO.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pidloop_common::config::ConfigError;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{LoopConfig, SimulationConfig, build_controller};
use crate::control::pid::PidController;

// ─── Simulated Process ──────────────────────────────────────────────

/// Measurement that rises by `step` per update until it reaches `ceiling`.
#[derive(Debug, Clone, PartialEq)]
pub struct RampingProcess {
    value: f64,
    step: f64,
    ceiling: f64,
}

impl RampingProcess {
    pub fn new(start: f64, step: f64, ceiling: f64) -> Self {
        Self {
            value: start,
            step,
            ceiling,
        }
    }

    /// Advance one update and return the new measurement.
    pub fn advance(&mut self) -> f64 {
        if self.value < self.ceiling {
            self.value += self.step;
        }
        self.value
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

// ─── Loop Statistics ────────────────────────────────────────────────

/// Counters kept by the runner. O(1) per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Measurements pushed into the controller.
    pub input_updates: u64,
    /// Ticks on which `compute` produced a new output.
    pub computes: u64,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub input_updated: bool,
    pub computed: bool,
}

// ─── Runner ─────────────────────────────────────────────────────────

/// Drives one controller against a [`RampingProcess`].
#[derive(Debug)]
pub struct LoopRunner<C: Clock> {
    pid: PidController<C>,
    process: RampingProcess,
    input_interval_ms: u64,
    next_input_ms: u64,
    stats: LoopStats,
}

impl<C: Clock> LoopRunner<C> {
    /// Build the controller from `config` and attach the simulated process.
    pub fn new(config: &LoopConfig, clock: C) -> Result<Self, ConfigError> {
        let pid = build_controller(&config.controller, clock)?;
        Ok(Self::with_controller(pid, &config.simulation))
    }

    /// Wrap an existing controller. The process starts at its current input.
    pub fn with_controller(pid: PidController<C>, simulation: &SimulationConfig) -> Self {
        let process = RampingProcess::new(pid.input(), simulation.step, simulation.ceiling);
        let input_interval_ms = simulation.input_interval_ms.max(1);
        let next_input_ms = pid.clock().now_ms() + input_interval_ms;
        Self {
            pid,
            process,
            input_interval_ms,
            next_input_ms,
            stats: LoopStats::default(),
        }
    }

    /// Execute one tick.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let now = self.pid.clock().now_ms();

        if now >= self.next_input_ms {
            let value = self.process.advance();
            self.pid.set_input(value);
            // Missed updates after a stall are dropped, not replayed.
            let missed = (now - self.next_input_ms) / self.input_interval_ms;
            self.next_input_ms += (missed + 1) * self.input_interval_ms;
            self.stats.input_updates += 1;
            outcome.input_updated = true;
            debug!(now, input = value, "measurement updated");
        }

        if self.pid.compute() {
            self.stats.computes += 1;
            outcome.computed = true;
            self.report();
        }

        self.stats.ticks += 1;
        outcome
    }

    /// Tick every `period` until `running` is cleared or `max_ticks` is hit.
    pub fn run(&mut self, running: &AtomicBool, period: Duration, max_ticks: Option<u64>) {
        info!(
            mode = %self.pid.mode(),
            sample_time_ms = self.pid.sample_time_ms(),
            "entering control loop"
        );

        while running.load(Ordering::SeqCst) {
            if max_ticks.is_some_and(|max| self.stats.ticks >= max) {
                break;
            }
            self.tick();
            std::thread::sleep(period);
        }

        info!(
            ticks = self.stats.ticks,
            computes = self.stats.computes,
            input_updates = self.stats.input_updates,
            "control loop stopped"
        );
    }

    #[inline]
    pub fn controller(&self) -> &PidController<C> {
        &self.pid
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut PidController<C> {
        &mut self.pid
    }

    #[inline]
    pub fn process(&self) -> &RampingProcess {
        &self.process
    }

    #[inline]
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    fn report(&self) {
        match self.pid.snapshot().to_json() {
            Ok(status) => info!(target: "pidloop::status", "{status}"),
            Err(e) => warn!("status serialization failed: {e}"),
        }
    }
}
