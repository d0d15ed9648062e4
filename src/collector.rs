//! Metric evaluation and report rendering.
//!
//! [`MetricsCollector`] turns a [`MetricRequest`] into one space-separated
//! line. Every metric is evaluated at the moment it is reached, in request
//! order, so repeated metrics are sampled again.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::collectors::thermal::{read_cpu_temperature, DEFAULT_THERMAL_ZONE};
use crate::error::CollectError;
use crate::metric::{bytes_to_mb, Metric, MetricValue};
use crate::request::{usage, Invocation, MetricRequest};
use crate::system::SystemInfo;

/// Window over which CPU busy time is averaged.
pub const DEFAULT_CPU_WINDOW: Duration = Duration::from_millis(500);

/// Evaluates metrics against a [`SystemInfo`] provider and the thermal zone.
pub struct MetricsCollector<S> {
    system: S,
    thermal_zone: PathBuf,
    cpu_window: Duration,
}

impl<S: SystemInfo> MetricsCollector<S> {
    pub fn new(system: S) -> Self {
        Self {
            system,
            thermal_zone: PathBuf::from(DEFAULT_THERMAL_ZONE),
            cpu_window: DEFAULT_CPU_WINDOW,
        }
    }

    pub fn with_thermal_zone(mut self, path: impl Into<PathBuf>) -> Self {
        self.thermal_zone = path.into();
        self
    }

    pub fn with_cpu_window(mut self, window: Duration) -> Self {
        self.cpu_window = window;
        self
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn thermal_zone(&self) -> &Path {
        &self.thermal_zone
    }

    pub fn cpu_window(&self) -> Duration {
        self.cpu_window
    }

    /// Reads the current value of a single metric.
    pub fn evaluate(&self, metric: Metric) -> Result<MetricValue, CollectError> {
        let value = match metric {
            Metric::CpuPercent => MetricValue::Float(self.system.cpu_percent(self.cpu_window)?),
            Metric::CpuFrequency => {
                let mhz = self.system.cpu_frequency()?;
                MetricValue::Integer(mhz.trunc().max(0.0) as u64)
            }
            Metric::CpuTemperature => MetricValue::Float(read_cpu_temperature(&self.thermal_zone)),
            Metric::RamUsed => {
                let mem = self.system.memory_stats()?;
                let used = mem.total_bytes.saturating_sub(mem.available_bytes);
                MetricValue::Integer(bytes_to_mb(used))
            }
            Metric::RamTotal => {
                MetricValue::Integer(bytes_to_mb(self.system.memory_stats()?.total_bytes))
            }
            Metric::RamPercent => MetricValue::Float(self.system.memory_stats()?.used_percent),
            Metric::SwapUsed => {
                MetricValue::Integer(bytes_to_mb(self.system.swap_stats()?.used_bytes))
            }
            Metric::SwapTotal => {
                MetricValue::Integer(bytes_to_mb(self.system.swap_stats()?.total_bytes))
            }
            Metric::SwapPercent => MetricValue::Float(self.system.swap_stats()?.used_percent),
        };

        debug!(metric = metric.token(), %value, "Evaluated metric");
        Ok(value)
    }

    /// Evaluates every metric of the request and joins the values with single spaces.
    pub fn render(&self, request: &MetricRequest) -> Result<String, CollectError> {
        let values = request
            .metrics()
            .iter()
            .map(|&metric| self.evaluate(metric).map(|v| v.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values.join(" "))
    }

    /// Writes the usage block or the report line for an invocation.
    ///
    /// The report line is written only once every metric evaluated, so a
    /// failure never leaves a partial line behind.
    pub fn run<W: Write>(&self, invocation: &Invocation, out: &mut W) -> Result<(), CollectError> {
        match invocation {
            Invocation::Help => {
                out.write_all(usage().as_bytes())?;
            }
            Invocation::Report(request) => {
                let line = self.render(request)?;
                writeln!(out, "{}", line)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
