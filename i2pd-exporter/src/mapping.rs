//! Value mapping helpers: byte units, label values and number formatting.

/// Integral values at or above this magnitude fall back to the shortest
/// round-trip rendering.
const MAX_PLAIN_INTEGER: f64 = 1e15;

/// Prometheus metric type emitted in `# TYPE` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    /// Get the TYPE comment string for Prometheus exposition format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Byte multiplier for a binary size unit as printed by the i2pd console.
///
/// Accepts both size (`GiB`) and rate (`KiB/s`) spellings. The lookup is
/// case-sensitive; unknown or empty units count as plain bytes.
pub fn unit_multiplier(unit: &str) -> f64 {
    let unit = unit.trim();
    let unit = unit.strip_suffix("/s").unwrap_or(unit);

    match unit {
        "KiB" => 1024.0,
        "MiB" => (1u64 << 20) as f64,
        "GiB" => (1u64 << 30) as f64,
        "TiB" => (1u64 << 40) as f64,
        _ => 1.0,
    }
}

/// Turn a display name such as `HTTP Proxy` into a label value (`http_proxy`).
///
/// Only `[a-z0-9_]` survives. Distinct names may collapse to the same value.
pub fn sanitize_label_value(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Escape special characters in label values.
pub fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

/// Format a floating point value for Prometheus.
///
/// Integral values below 1e15 print without a fractional part (`1073741824`),
/// everything else uses the shortest representation that parses back to the
/// same `f64` (`100.123`).
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else if value.fract() == 0.0 && value.abs() < MAX_PLAIN_INTEGER {
        (value as i64).to_string()
    } else {
        // f64's Display is shortest round-trip and never uses an exponent.
        value.to_string()
    }
}

/// Map a boolean flag onto the 1/0 gauge convention.
pub fn bool_value(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_multiplier_sizes() {
        assert_eq!(unit_multiplier("KiB"), 1024.0);
        assert_eq!(unit_multiplier("MiB"), 1_048_576.0);
        assert_eq!(unit_multiplier("GiB"), 1_073_741_824.0);
        assert_eq!(unit_multiplier("TiB"), 1_099_511_627_776.0);
    }

    #[test]
    fn test_unit_multiplier_rates() {
        assert_eq!(unit_multiplier("KiB/s"), 1024.0);
        assert_eq!(unit_multiplier("GiB/s"), 1_073_741_824.0);
    }

    #[test]
    fn test_unit_multiplier_trims_whitespace() {
        assert_eq!(unit_multiplier("  MiB "), 1_048_576.0);
        assert_eq!(unit_multiplier(" KiB/s\n"), 1024.0);
    }

    #[test]
    fn test_unit_multiplier_rejects_space_before_rate_suffix() {
        assert_eq!(unit_multiplier("KiB /s"), 1.0);
    }

    #[test]
    fn test_unit_multiplier_unknown_is_bytes() {
        assert_eq!(unit_multiplier("B"), 1.0);
        assert_eq!(unit_multiplier(""), 1.0);
        assert_eq!(unit_multiplier("kib"), 1.0);
        assert_eq!(unit_multiplier("PiB"), 1.0);
    }

    #[test]
    fn test_sanitize_label_value() {
        assert_eq!(sanitize_label_value("HTTP Proxy"), "http_proxy");
        assert_eq!(sanitize_label_value("SOCKS Proxy"), "socks_proxy");
        assert_eq!(sanitize_label_value("BOB"), "bob");
        assert_eq!(sanitize_label_value("SAM"), "sam");
        assert_eq!(sanitize_label_value("I2CP"), "i2cp");
        assert_eq!(sanitize_label_value("I2PControl"), "i2pcontrol");
    }

    #[test]
    fn test_sanitize_label_value_drops_punctuation() {
        assert_eq!(sanitize_label_value("  Web-Console (v2) "), "webconsole_v2");
        assert_eq!(sanitize_label_value("a&nbsp;b"), "anbspb");
        assert_eq!(sanitize_label_value(""), "");
    }

    #[test]
    fn test_sanitize_label_value_collisions_are_kept() {
        assert_eq!(
            sanitize_label_value("HTTP-Proxy"),
            sanitize_label_value("HTTPProxy")
        );
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("simple"), "simple");
        assert_eq!(escape_label_value("with\"quote"), "with\\\"quote");
        assert_eq!(escape_label_value("with\\backslash"), "with\\\\backslash");
        assert_eq!(escape_label_value("with\nnewline"), "with\\nnewline");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(100.123), "100.123");
        assert_eq!(format_value(1_073_741_824.0), "1073741824");
    }

    #[test]
    fn test_format_value_edge_cases() {
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(0.042), "0.042");
        assert_eq!(format_value(1e15), "1000000000000000");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_metric_kind_as_str() {
        assert_eq!(MetricKind::Counter.as_str(), "counter");
        assert_eq!(MetricKind::Gauge.as_str(), "gauge");
    }

    #[test]
    fn test_bool_value() {
        assert_eq!(bool_value(true), 1.0);
        assert_eq!(bool_value(false), 0.0);
    }
}
