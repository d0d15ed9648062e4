//! Configuration management for yasymon.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use yasymon::system::{DEFAULT_PROC_ROOT, DEFAULT_SYS_ROOT};
use yasymon::{OrderPolicy, DEFAULT_CPU_WINDOW, DEFAULT_THERMAL_ZONE};

use crate::cli::{Args, ConfigFormat, LogLevel};

// Default configuration constants
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const MAX_CPU_SAMPLE_MS: u64 = 10_000;

/// Locations searched when no --config is given, first match wins.
const DEFAULT_CONFIG_PATHS: [&str; 8] = [
    "/etc/yasymon/yasymon.yaml",
    "/etc/yasymon/yasymon.yml",
    "/etc/yasymon/yasymon.json",
    "/etc/yasymon/yasymon.toml",
    "./yasymon.yaml",
    "./yasymon.yml",
    "./yasymon.json",
    "./yasymon.toml",
];

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "positional" | "fixed"
    pub policy: Option<OrderPolicy>,

    /// CPU usage sampling window in milliseconds
    #[serde(alias = "cpu-sample-ms")]
    pub cpu_sample_ms: Option<u64>,

    /// Thermal zone file read for the CPU temperature
    #[serde(alias = "thermal-zone-path")]
    pub thermal_zone_path: Option<PathBuf>,

    // Counter roots
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "sys-root")]
    pub sys_root: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: Some(OrderPolicy::default()),
            cpu_sample_ms: Some(DEFAULT_CPU_WINDOW.as_millis() as u64),
            thermal_zone_path: Some(PathBuf::from(DEFAULT_THERMAL_ZONE)),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            sys_root: Some(PathBuf::from(DEFAULT_SYS_ROOT)),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn policy(&self) -> OrderPolicy {
        self.policy.unwrap_or_default()
    }

    pub fn cpu_window(&self) -> Duration {
        self.cpu_sample_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CPU_WINDOW)
    }

    pub fn thermal_zone_path(&self) -> PathBuf {
        self.thermal_zone_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_THERMAL_ZONE))
    }

    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn sys_root(&self) -> PathBuf {
        self.sys_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYS_ROOT))
    }

    /// Configured log level, falling back to warn for unknown names.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::from_name)
            .unwrap_or(LogLevel::Warn)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> anyhow::Result<()> {
    if let Some(ms) = cfg.cpu_sample_ms {
        if ms == 0 || ms > MAX_CPU_SAMPLE_MS {
            bail!(
                "cpu_sample_ms must be between 1 and {}, got {}",
                MAX_CPU_SAMPLE_MS,
                ms
            );
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_name(level).is_none() {
            bail!(
                "Invalid log_level '{}', expected one of off/error/warn/info/debug/trace",
                level
            );
        }
    }

    for (name, root) in [("proc_root", &cfg.proc_root), ("sys_root", &cfg.sys_root)] {
        if let Some(root) = root {
            if !root.is_dir() {
                bail!("{} is not a directory: {}", name, root.display());
            }
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(policy) = args.policy {
        config.policy = Some(policy);
    }
    if let Some(ms) = args.cpu_sample_ms {
        config.cpu_sample_ms = Some(ms);
    }
    if let Some(path) = &args.thermal_zone {
        config.thermal_zone_path = Some(path.clone());
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }

    Ok(config)
}

/// Loads the config file at `path`, or the first default location that exists.
/// Fields missing from the file keep their defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            Some(p) => p.to_path_buf(),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(&content, &path)?;
    debug!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config content, choosing the format by file extension (YAML by default).
pub fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?,
        Some("toml") => toml::from_str(content)
            .with_context(|| format!("Invalid TOML config {}", path.display()))?,
        _ => serde_yaml::from_str(content)
            .with_context(|| format!("Invalid YAML config {}", path.display()))?,
    };
    Ok(config)
}

/// Renders configuration in the requested format
pub fn render_config(config: &Config, format: ConfigFormat) -> anyhow::Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> anyhow::Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
