//! CLI arguments for yasymon.
//!
//! Metric tokens (`-cp`, `-ru`, ...) look like clustered short flags, so the
//! command defines no short options and collects every token as a raw
//! positional value. Options are long-only and must come before the first
//! metric token.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use yasymon::OrderPolicy;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parses a level name as used in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }

    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "yasymon",
    about = "Reports CPU, RAM and Swap usage information on a single line",
    long_about = "Reports CPU, RAM and Swap usage information on a single line.\n\n\
                  Metric tokens are printed in the order given: -cp (CPU %), -cf (CPU MHz), \
                  -ct (CPU °C), -ru/-rt/-rp (RAM used MB, total MB, %), \
                  -su/-st/-sp (Swap used MB, total MB, %). Run with -h for the short usage.",
    version,
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (built ",
        env!("VERGEN_BUILD_TIMESTAMP"),
        ")"
    ),
    disable_help_flag = true
)]
pub struct Args {
    /// Print help for the options
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Output ordering policy
    #[arg(long, value_enum)]
    pub policy: Option<OrderPolicy>,

    /// CPU usage sampling window in milliseconds
    #[arg(long)]
    pub cpu_sample_ms: Option<u64>,

    /// Thermal zone file holding the CPU temperature in millidegrees
    #[arg(long)]
    pub thermal_zone: Option<PathBuf>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Metric tokens: -cp -cf -ct -ru -rt -rp -su -st -sp (-h alone for usage)
    #[arg(
        value_name = "METRIC",
        num_args = 0..,
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    pub tokens: Vec<String>,
}
