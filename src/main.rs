//! yasymon - version 0.1.0
//!
//! Prints the requested system metrics on a single line.
//! This is the main entry point that resolves configuration, sets up logging
//! and runs the metrics collector once.

mod cli;
mod config;

use anyhow::Context;
use clap::Parser;
use std::io;
use tracing::{debug, info};
use yasymon::{resolve, Invocation, MetricsCollector, ProcSystemInfo};

use cli::Args;
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs always go to stderr; stdout carries only the report line.
fn setup_logging(config: &Config) {
    let log_level = config.log_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level.filter())
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    debug!("Logging initialized with level: {:?}", log_level);
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args)?;

    if args.check_config {
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("Configuration invalid: {:#}", e);
            std::process::exit(1);
        }
        println!("Configuration is valid");
        return Ok(());
    }

    validate_effective_config(&config).context("Configuration invalid")?;

    if args.show_config {
        return show_config(&config, args.config_format);
    }

    setup_logging(&config);

    let policy = config.policy();
    let invocation = resolve(&args.tokens, policy);
    match &invocation {
        Invocation::Help => debug!("Help requested, no metrics evaluated"),
        Invocation::Report(request) => info!(
            "Evaluating {} metric(s) with {:?} policy",
            request.len(),
            policy
        ),
    }

    let system = ProcSystemInfo::new(config.proc_root(), config.sys_root());
    let collector = MetricsCollector::new(system)
        .with_thermal_zone(config.thermal_zone_path())
        .with_cpu_window(config.cpu_window());

    let stdout = io::stdout();
    collector
        .run(&invocation, &mut stdout.lock())
        .context("Failed to collect metrics")?;

    Ok(())
}
