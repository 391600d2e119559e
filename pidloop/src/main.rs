//! # pidloop
//!
//! Runs one PID controller against a simulated ramping process, logging a
//! status line each time the controller produces a new output.
//!
//! Loads the loop TOML (`[shared]`, `[controller]`, optional `[simulation]`),
//! builds the controller on the system clock, and polls it until Ctrl-C or
//! until `--ticks` iterations have run.

use clap::Parser;
use pidloop::clock::SystemClock;
use pidloop::config::{LoopConfig, load_config};
use pidloop::cycle::LoopRunner;
use pidloop_common::config::LogLevel;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// pidloop — PID controller polling loop
#[derive(Parser, Debug)]
#[command(name = "pidloop")]
#[command(version)]
#[command(about = "Drive a PID controller against a simulated process")]
struct Args {
    /// Path to the loop configuration TOML.
    #[arg(default_value = "config/loop.toml")]
    config: PathBuf,

    /// Stop after this many loop iterations (default: run until Ctrl-C).
    #[arg(long)]
    ticks: Option<u64>,

    /// Poll period in milliseconds.
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,

    /// Enable verbose logging (DEBUG level), overriding the config.
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            setup_tracing(&args, LogLevel::Info);
            error!("FATAL: failed to load {}: {e}", args.config.display());
            process::exit(1);
        }
    };
    setup_tracing(&args, config.shared.log_level);

    info!(
        "pidloop v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("pidloop shutdown complete");
}

fn run(args: &Args, config: &LoopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut runner = LoopRunner::new(config, SystemClock::new())?;
    let pid = runner.controller();
    info!(
        "Controller OK: kp={} ki={} kd={} direction={} limits={:?} sample_time={}ms",
        pid.kp(),
        pid.ki(),
        pid.kd(),
        pid.direction(),
        pid.output_limits(),
        pid.sample_time_ms(),
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    runner.run(&running, Duration::from_millis(args.tick_ms), args.ticks);
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        configured.into()
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
