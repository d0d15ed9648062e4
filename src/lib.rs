//! yasymon - system monitoring values on a single line
//!
//! This library evaluates point-in-time system metrics (CPU usage, frequency
//! and temperature, RAM and swap usage) and renders them as one
//! space-separated line, suitable for status bars and polling scripts.
//!
//! # Usage
//!
//! ```no_run
//! use yasymon::{resolve, MetricsCollector, OrderPolicy, ProcSystemInfo};
//!
//! let collector = MetricsCollector::new(ProcSystemInfo::default());
//! let invocation = resolve(&["-cp", "-rp", "-ct"], OrderPolicy::Positional);
//! collector.run(&invocation, &mut std::io::stdout()).unwrap();
//! ```
//!
//! Counters are read through the [`SystemInfo`] trait, so any other source
//! (or a fake in tests) can stand in for `/proc` and `/sys`.

pub mod collector;
pub mod collectors;
pub mod error;
pub mod metric;
pub mod request;
pub mod system;

// Re-export main types for convenience
pub use collector::{MetricsCollector, DEFAULT_CPU_WINDOW};
pub use collectors::thermal::{read_cpu_temperature, DEFAULT_THERMAL_ZONE};
pub use error::CollectError;
pub use metric::{Metric, MetricValue};
pub use request::{resolve, usage, Invocation, MetricRequest, OrderPolicy};
pub use system::{MemoryStats, ProcSystemInfo, SwapStats, SystemInfo};
