//! Integration tests for the procfs/sysfs provider.
//!
//! A fake `/proc` and `/sys` tree is built in a temporary directory for each
//! test, then `ProcSystemInfo` is pointed at it.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use yasymon::{CollectError, ProcSystemInfo, SystemInfo};

const MEMINFO: &str = "\
MemTotal:        4194304 kB
MemFree:          524288 kB
MemAvailable:    3145728 kB
Buffers:          102400 kB
Cached:          1048576 kB
SwapTotal:       1048576 kB
SwapFree:         786432 kB
";

struct FakeRoots {
    _dir: TempDir,
    proc_root: std::path::PathBuf,
    sys_root: std::path::PathBuf,
}

impl FakeRoots {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let proc_root = dir.path().join("proc");
        let sys_root = dir.path().join("sys");
        fs::create_dir_all(&proc_root).unwrap();
        fs::create_dir_all(sys_root.join("devices/system/cpu")).unwrap();
        Self {
            _dir: dir,
            proc_root,
            sys_root,
        }
    }

    fn write(&self, relative: &str, content: &str) {
        let path = if let Some(rest) = relative.strip_prefix("proc/") {
            self.proc_root.join(rest)
        } else if let Some(rest) = relative.strip_prefix("sys/") {
            self.sys_root.join(rest)
        } else {
            panic!("unexpected fixture path {}", relative);
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn provider(&self) -> ProcSystemInfo {
        ProcSystemInfo::new(&self.proc_root, &self.sys_root)
    }
}

#[test]
fn test_memory_stats_from_meminfo() {
    let roots = FakeRoots::new();
    roots.write("proc/meminfo", MEMINFO);

    let mem = roots.provider().memory_stats().unwrap();
    assert_eq!(mem.total_bytes, 4 * 1024 * 1024 * 1024);
    assert_eq!(mem.available_bytes, 3 * 1024 * 1024 * 1024);
    assert_eq!(mem.used_percent, 25.0);
}

#[test]
fn test_swap_stats_from_meminfo() {
    let roots = FakeRoots::new();
    roots.write("proc/meminfo", MEMINFO);

    let swap = roots.provider().swap_stats().unwrap();
    assert_eq!(swap.total_bytes, 1024 * 1024 * 1024);
    assert_eq!(swap.used_bytes, 256 * 1024 * 1024);
    assert_eq!(swap.used_percent, 25.0);
}

#[test]
fn test_missing_meminfo_is_read_error() {
    let roots = FakeRoots::new();
    let result = roots.provider().memory_stats();
    assert!(matches!(result, Err(CollectError::Read { .. })));
}

#[test]
fn test_cpu_percent_with_static_counters() {
    let roots = FakeRoots::new();
    roots.write("proc/stat", "cpu  10 0 10 80 0 0 0 0 0 0\nctxt 1\n");

    // identical samples: no ticks elapsed
    let percent = roots
        .provider()
        .cpu_percent(Duration::from_millis(1))
        .unwrap();
    assert_eq!(percent, 0.0);
}

#[test]
fn test_cpu_percent_malformed_stat() {
    let roots = FakeRoots::new();
    roots.write("proc/stat", "cpu  a b c d\n");
    let result = roots.provider().cpu_percent(Duration::from_millis(1));
    assert!(matches!(result, Err(CollectError::Parse { .. })));
}

#[test]
fn test_cpu_frequency_from_policies() {
    let roots = FakeRoots::new();
    roots.write(
        "sys/devices/system/cpu/cpufreq/policy0/scaling_cur_freq",
        "1800000\n",
    );
    roots.write(
        "sys/devices/system/cpu/cpufreq/policy1/scaling_cur_freq",
        "1200500\n",
    );

    let mhz = roots.provider().cpu_frequency().unwrap();
    assert_eq!(mhz, 1500.25);
}

#[test]
fn test_cpu_frequency_falls_back_to_cpuinfo_cur_freq() {
    let roots = FakeRoots::new();
    roots.write(
        "sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_cur_freq",
        "2000000\n",
    );

    let mhz = roots.provider().cpu_frequency().unwrap();
    assert_eq!(mhz, 2000.0);
}

#[test]
fn test_cpu_frequency_prefers_matching_cpuinfo() {
    let roots = FakeRoots::new();
    roots.write(
        "sys/devices/system/cpu/cpufreq/policy0/scaling_cur_freq",
        "1000000\n",
    );
    roots.write(
        "proc/cpuinfo",
        "processor\t: 0\ncpu MHz\t\t: 3100.500\n",
    );

    let mhz = roots.provider().cpu_frequency().unwrap();
    assert_eq!(mhz, 3100.5);
}

#[test]
fn test_cpu_frequency_cpuinfo_only() {
    let roots = FakeRoots::new();
    roots.write(
        "proc/cpuinfo",
        "processor\t: 0\ncpu MHz\t\t: 2000.0\n\nprocessor\t: 1\ncpu MHz\t\t: 3000.0\n",
    );

    let mhz = roots.provider().cpu_frequency().unwrap();
    assert_eq!(mhz, 2500.0);
}

#[test]
fn test_cpu_frequency_unavailable() {
    let roots = FakeRoots::new();
    let result = roots.provider().cpu_frequency();
    assert!(matches!(result, Err(CollectError::Unavailable { .. })));
}

/// Sanity checks against the host's live counters, skipped off Linux.
#[test]
fn test_live_memory_bounds() {
    if !Path::new("/proc/meminfo").exists() {
        return;
    }
    let provider = ProcSystemInfo::default();
    let mem = provider.memory_stats().unwrap();
    let total_mb = mem.total_bytes / 1024 / 1024;
    let used_mb = (mem.total_bytes - mem.available_bytes) / 1024 / 1024;
    assert!(total_mb > 0);
    assert!(used_mb <= total_mb);
    assert!((0.0..=100.0).contains(&mem.used_percent));

    let swap = provider.swap_stats().unwrap();
    assert!(swap.used_bytes <= swap.total_bytes);
}

#[test]
fn test_live_cpu_percent_in_range() {
    if !Path::new("/proc/stat").exists() {
        return;
    }
    let percent = ProcSystemInfo::default()
        .cpu_percent(Duration::from_millis(50))
        .unwrap();
    assert!((0.0..=100.0).contains(&percent));
}
