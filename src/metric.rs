//! Metric identifiers and their rendered values.
//!
//! Each [`Metric`] has exactly one command-line spelling. The declaration
//! order of the variants is the fixed output order used by
//! [`OrderPolicy::Fixed`](crate::request::OrderPolicy::Fixed).

use std::fmt;

/// A single system metric that can be requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    CpuPercent,
    CpuFrequency,
    CpuTemperature,
    RamUsed,
    RamTotal,
    RamPercent,
    SwapUsed,
    SwapTotal,
    SwapPercent,
}

impl Metric {
    /// All metrics in fixed output order.
    pub const ALL: [Metric; 9] = [
        Metric::CpuPercent,
        Metric::CpuFrequency,
        Metric::CpuTemperature,
        Metric::RamUsed,
        Metric::RamTotal,
        Metric::RamPercent,
        Metric::SwapUsed,
        Metric::SwapTotal,
        Metric::SwapPercent,
    ];

    /// Command-line token selecting this metric.
    pub fn token(self) -> &'static str {
        match self {
            Metric::CpuPercent => "-cp",
            Metric::CpuFrequency => "-cf",
            Metric::CpuTemperature => "-ct",
            Metric::RamUsed => "-ru",
            Metric::RamTotal => "-rt",
            Metric::RamPercent => "-rp",
            Metric::SwapUsed => "-su",
            Metric::SwapTotal => "-st",
            Metric::SwapPercent => "-sp",
        }
    }

    /// Looks up a metric by its token. Surrounding whitespace is ignored.
    pub fn from_token(token: &str) -> Option<Metric> {
        let token = token.trim();
        Metric::ALL.into_iter().find(|m| m.token() == token)
    }

    /// One-line description used in the usage block.
    pub fn description(self) -> &'static str {
        match self {
            Metric::CpuPercent => "output CPU usage as a percentage",
            Metric::CpuFrequency => "output CPU frequency in MHz",
            Metric::CpuTemperature => "output CPU temperature in degrees Celsius",
            Metric::RamUsed => "output RAM usage in MB",
            Metric::RamTotal => "output RAM total in MB",
            Metric::RamPercent => "output RAM usage as a percentage",
            Metric::SwapUsed => "output Swap usage in MB",
            Metric::SwapTotal => "output Swap total in MB",
            Metric::SwapPercent => "output Swap usage as a percentage",
        }
    }
}

/// Value of a metric at the moment it was evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Percentages and temperatures.
    Float(f64),
    /// Frequencies in MHz and memory sizes in MB.
    Integer(u64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Float(v) => f.write_str(&format_float(*v)),
            MetricValue::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Shortest round-trip rendering with a decimal point on whole numbers
/// ("0.0", not "0") and a signed two-digit exponent ("1e+17", "1.5e-05").
fn format_float(value: f64) -> String {
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

/// Converts a byte count to megabytes by flooring through kilobytes.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / 1024 / 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lookup() {
        assert_eq!(Metric::from_token("-cp"), Some(Metric::CpuPercent));
        assert_eq!(Metric::from_token("-sp"), Some(Metric::SwapPercent));
        assert_eq!(Metric::from_token(" -rt "), Some(Metric::RamTotal));
        assert_eq!(Metric::from_token("-zz"), None);
        assert_eq!(Metric::from_token("-h"), None);
        assert_eq!(Metric::from_token("cp"), None);
    }

    #[test]
    fn test_tokens_are_unique() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_token(metric.token()), Some(metric));
        }
    }

    #[test]
    fn test_float_rendering_keeps_decimal_point() {
        assert_eq!(MetricValue::Float(0.0).to_string(), "0.0");
        assert_eq!(MetricValue::Float(12.3).to_string(), "12.3");
        assert_eq!(MetricValue::Float(45.231).to_string(), "45.231");
        assert_eq!(MetricValue::Float(100.0).to_string(), "100.0");
    }

    #[test]
    fn test_float_rendering_exponent() {
        assert_eq!(MetricValue::Float(1e17).to_string(), "1e+17");
        assert_eq!(MetricValue::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(MetricValue::Float(2.5e123).to_string(), "2.5e+123");
        assert_eq!(MetricValue::Float(1e16).to_string(), "1e+16");
        assert_eq!(
            MetricValue::Float(9999999999999998.0).to_string(),
            "9999999999999998.0"
        );
    }

    #[test]
    fn test_integer_rendering() {
        assert_eq!(MetricValue::Integer(0).to_string(), "0");
        assert_eq!(MetricValue::Integer(2400).to_string(), "2400");
    }

    #[test]
    fn test_bytes_to_mb_floors() {
        assert_eq!(bytes_to_mb(3 * 1024 * 1024 + 500), 3);
        assert_eq!(bytes_to_mb(1024 * 1024 - 1), 0);
        assert_eq!(bytes_to_mb(0), 0);
    }
}
