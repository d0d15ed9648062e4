//! CPU temperature from the thermal pseudo-file.
//!
//! The kernel exposes the temperature of a thermal zone as a single line of
//! millidegrees Celsius, e.g. `/sys/class/thermal/thermal_zone0/temp`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Thermal zone read when no other path is configured.
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Value reported when the zone is missing, unreadable or malformed.
pub const TEMPERATURE_UNAVAILABLE: f64 = 0.0;

/// Reads the CPU temperature in degrees Celsius.
///
/// Never fails: any problem with the file yields [`TEMPERATURE_UNAVAILABLE`].
pub fn read_cpu_temperature(path: &Path) -> f64 {
    if !path.is_file() {
        debug!("Thermal zone {} not present", path.display());
        return TEMPERATURE_UNAVAILABLE;
    }

    let line = match read_first_line(path) {
        Ok(line) => line,
        Err(e) => {
            debug!("Failed to read thermal zone {}: {}", path.display(), e);
            return TEMPERATURE_UNAVAILABLE;
        }
    };

    parse_millidegrees(&line).unwrap_or_else(|| {
        debug!(
            "Unexpected content in thermal zone {}: {:?}",
            path.display(),
            line
        );
        TEMPERATURE_UNAVAILABLE
    })
}

fn read_first_line(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

/// Converts a millidegree line to degrees. Only plain ASCII digits are accepted.
pub fn parse_millidegrees(line: &str) -> Option<f64> {
    let digits = line.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<f64>().ok().map(|millidegrees| millidegrees / 1000.0)
}
