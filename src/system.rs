//! System-wide counters from the /proc and /sys filesystems.
//!
//! [`SystemInfo`] is the seam between metric evaluation and the operating
//! system. [`ProcSystemInfo`] implements it by reading:
//! - `/proc/stat` for aggregate CPU times,
//! - `/proc/meminfo` for memory and swap sizes,
//! - `/sys/devices/system/cpu/.../cpufreq` and `/proc/cpuinfo` for clock speed.
//!
//! Both roots are configurable so the provider can run against a fixture tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::CollectError;

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_SYS_ROOT: &str = "/sys";

/// Physical memory counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryStats {
    pub total_bytes: u64,
    pub available_bytes: u64,
    /// Share of memory not available to new allocations, one decimal.
    pub used_percent: f64,
}

/// Swap space counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapStats {
    pub total_bytes: u64,
    pub used_bytes: u64,
    /// Share of swap in use, one decimal.
    pub used_percent: f64,
}

/// Source of live system counters.
pub trait SystemInfo {
    /// Busy CPU percentage averaged over `window`. Blocks for the whole window.
    fn cpu_percent(&self, window: Duration) -> Result<f64, CollectError>;

    /// Current CPU clock frequency in MHz, averaged across CPUs.
    fn cpu_frequency(&self) -> Result<f64, CollectError>;

    fn memory_stats(&self) -> Result<MemoryStats, CollectError>;

    fn swap_stats(&self) -> Result<SwapStats, CollectError>;
}

/// Aggregate CPU times from the first line of /proc/stat, in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Total CPU time. Guest time is already accounted in user and nice.
    pub fn total(&self) -> u64 {
        [
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(self.user, |acc, v| acc.saturating_add(*v))
    }

    /// Non-busy time (idle + iowait).
    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn busy(&self) -> u64 {
        self.total().saturating_sub(self.idle_total())
    }
}

/// Busy percentage between two samples, clamped to [0, 100] and rounded to one decimal.
pub fn busy_percent(previous: &CpuTimes, current: &CpuTimes) -> f64 {
    let delta_total = current.total().saturating_sub(previous.total());
    if delta_total == 0 {
        return 0.0;
    }
    let delta_busy = current.busy().saturating_sub(previous.busy());
    let percent = delta_busy as f64 / delta_total as f64 * 100.0;
    round_one_decimal(percent.clamp(0.0, 100.0))
}

/// Rounds a percentage to one decimal place.
///
/// Exact binary ties round to the even digit (6.25 -> 6.2), the same as the
/// fixed-precision formatter.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(used as f64 / total as f64 * 100.0)
}

/// Parses the aggregate `cpu` line from /proc/stat content.
pub fn parse_cpu_times(content: &str, source: &Path) -> Result<CpuTimes, CollectError> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| CollectError::Parse {
            path: source.display().to_string(),
            detail: "aggregate cpu line not found".to_string(),
        })?;

    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|e| CollectError::Parse {
            path: source.display().to_string(),
            detail: format!("invalid cpu time field: {}", e),
        })?;

    if fields.len() < 4 {
        return Err(CollectError::Parse {
            path: source.display().to_string(),
            detail: format!("expected at least 4 cpu time fields, got {}", fields.len()),
        });
    }

    let field = |i: usize| fields.get(i).copied().unwrap_or(0);
    Ok(CpuTimes {
        user: field(0),
        nice: field(1),
        system: field(2),
        idle: field(3),
        iowait: field(4),
        irq: field(5),
        softirq: field(6),
        steal: field(7),
    })
}

/// Memory and swap fields of /proc/meminfo, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meminfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: Option<u64>,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

impl Meminfo {
    /// Available memory, estimated from free + buffers + cached on kernels
    /// without MemAvailable.
    pub fn available(&self) -> u64 {
        self.mem_available
            .unwrap_or_else(|| {
                self.mem_free
                    .saturating_add(self.buffers)
                    .saturating_add(self.cached)
            })
            .min(self.mem_total)
    }

    pub fn memory_stats(&self) -> MemoryStats {
        let available = self.available();
        MemoryStats {
            total_bytes: self.mem_total,
            available_bytes: available,
            used_percent: usage_percent(self.mem_total - available, self.mem_total),
        }
    }

    pub fn swap_stats(&self) -> SwapStats {
        let used = self.swap_total.saturating_sub(self.swap_free);
        SwapStats {
            total_bytes: self.swap_total,
            used_bytes: used,
            used_percent: usage_percent(used, self.swap_total),
        }
    }
}

/// Parses /proc/meminfo content. Values in the file are in kB.
pub fn parse_meminfo(content: &str, source: &Path) -> Result<Meminfo, CollectError> {
    let mut info = Meminfo::default();
    let mut have_total = false;
    let mut have_swap = (false, false);

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        let slot = match parts[0] {
            "MemTotal:" => {
                have_total = true;
                &mut info.mem_total
            }
            "MemFree:" => &mut info.mem_free,
            "Buffers:" => &mut info.buffers,
            "Cached:" => &mut info.cached,
            "SwapTotal:" => {
                have_swap.0 = true;
                &mut info.swap_total
            }
            "SwapFree:" => {
                have_swap.1 = true;
                &mut info.swap_free
            }
            "MemAvailable:" => {
                info.mem_available = Some(parse_kb(parts[1], source)?);
                continue;
            }
            _ => continue,
        };
        *slot = parse_kb(parts[1], source)?;
    }

    if !have_total {
        return Err(CollectError::Parse {
            path: source.display().to_string(),
            detail: "MemTotal not found".to_string(),
        });
    }
    if !(have_swap.0 && have_swap.1) {
        return Err(CollectError::Parse {
            path: source.display().to_string(),
            detail: "SwapTotal/SwapFree not found".to_string(),
        });
    }

    Ok(info)
}

fn parse_kb(value: &str, source: &Path) -> Result<u64, CollectError> {
    value
        .parse::<u64>()
        .ok()
        .and_then(|kb| kb.checked_mul(1024))
        .ok_or_else(|| CollectError::Parse {
            path: source.display().to_string(),
            detail: format!("expected integer kB value, got '{}'", value),
        })
}

/// Extracts every `cpu MHz` value from /proc/cpuinfo content.
pub fn parse_cpuinfo_mhz(content: &str) -> Vec<f64> {
    content
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("cpu mhz") {
                value.trim().parse::<f64>().ok()
            } else {
                None
            }
        })
        .collect()
}

/// Counter provider backed by procfs and sysfs.
#[derive(Debug, Clone)]
pub struct ProcSystemInfo {
    proc_root: PathBuf,
    sys_root: PathBuf,
}

impl Default for ProcSystemInfo {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT, DEFAULT_SYS_ROOT)
    }
}

impl ProcSystemInfo {
    pub fn new(proc_root: impl Into<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
        }
    }

    fn read(&self, path: &Path) -> Result<String, CollectError> {
        fs::read_to_string(path).map_err(|e| CollectError::Read {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn read_cpu_times(&self) -> Result<CpuTimes, CollectError> {
        let path = self.proc_root.join("stat");
        let content = self.read(&path)?;
        parse_cpu_times(&content, &path)
    }

    pub fn read_meminfo(&self) -> Result<Meminfo, CollectError> {
        let path = self.proc_root.join("meminfo");
        let content = self.read(&path)?;
        parse_meminfo(&content, &path)
    }

    fn read_cpuinfo_mhz(&self) -> Vec<f64> {
        match fs::read_to_string(self.proc_root.join("cpuinfo")) {
            Ok(content) => parse_cpuinfo_mhz(&content),
            Err(e) => {
                debug!("Failed to read cpuinfo: {}", e);
                Vec::new()
            }
        }
    }

    /// Per-CPU cpufreq directories, ordered by CPU/policy number.
    fn cpufreq_dirs(&self) -> Vec<PathBuf> {
        let cpu_base = self.sys_root.join("devices/system/cpu");

        let policies = numbered_entries(&cpu_base.join("cpufreq"), "policy");
        if !policies.is_empty() {
            return policies;
        }

        numbered_entries(&cpu_base, "cpu")
            .into_iter()
            .map(|dir| dir.join("cpufreq"))
            .filter(|dir| dir.is_dir())
            .collect()
    }

    /// Current frequency of a cpufreq directory in MHz.
    fn read_cpufreq_mhz(dir: &Path) -> Option<f64> {
        ["scaling_cur_freq", "cpuinfo_cur_freq"]
            .iter()
            .find_map(|name| {
                let content = fs::read_to_string(dir.join(name)).ok()?;
                content.trim().parse::<u64>().ok()
            })
            .map(|khz| khz as f64 / 1000.0)
    }
}

/// Lists `<prefix><N>` entries under `dir`, sorted by N.
fn numbered_entries(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut numbered: Vec<(u32, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let index = name.to_str()?.strip_prefix(prefix)?.parse::<u32>().ok()?;
            Some((index, entry.path()))
        })
        .collect();

    numbered.sort_by_key(|(index, _)| *index);
    numbered.into_iter().map(|(_, path)| path).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

impl SystemInfo for ProcSystemInfo {
    fn cpu_percent(&self, window: Duration) -> Result<f64, CollectError> {
        let before = self.read_cpu_times()?;
        thread::sleep(window);
        let after = self.read_cpu_times()?;
        let percent = busy_percent(&before, &after);
        trace!(?before, ?after, percent, "Sampled CPU times");
        Ok(percent)
    }

    fn cpu_frequency(&self) -> Result<f64, CollectError> {
        let dirs = self.cpufreq_dirs();
        let cpuinfo = self.read_cpuinfo_mhz();

        let per_cpu: Vec<f64> = if dirs.is_empty() {
            cpuinfo
        } else if dirs.len() == cpuinfo.len() {
            // one cpuinfo entry per cpufreq dir
            cpuinfo
        } else {
            dirs.iter()
                .filter_map(|dir| Self::read_cpufreq_mhz(dir))
                .collect()
        };

        debug!("CPU frequency samples: {:?}", per_cpu);
        mean(&per_cpu).ok_or_else(|| CollectError::Unavailable {
            what: "CPU frequency".to_string(),
        })
    }

    fn memory_stats(&self) -> Result<MemoryStats, CollectError> {
        Ok(self.read_meminfo()?.memory_stats())
    }

    fn swap_stats(&self) -> Result<SwapStats, CollectError> {
        Ok(self.read_meminfo()?.swap_stats())
    }
}
