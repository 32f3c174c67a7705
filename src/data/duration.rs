//! Poll interval parsing and formatting.

use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to milliseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ms", 1.0),
    ("h", 3_600_000.0),
    ("m", 60_000.0),
    ("s", 1_000.0),
];

/// Parse interval strings like "2s", "500ms", "1.5s", "1m".
///
/// A bare number is taken as milliseconds.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let s = s.trim();

    if let Ok(millis) = s.parse::<u64>() {
        return Ok(Duration::from_millis(millis));
    }

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Interval must be a positive number: {}", s);
            }
            return Ok(Duration::from_millis((val * multiplier).round() as u64));
        }
    }

    bail!("Unknown interval format: {}", s)
}

/// Format an interval for display ("2s", "500ms", "1m30s").
pub fn format_interval(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis % 1_000 != 0 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        let secs = d.as_secs();
        match (secs / 60, secs % 60) {
            (0, s) => format!("{}s", s),
            (m, 0) => format!("{}m", m),
            (m, s) => format!("{}m{}s", m, s),
        }
    }
}

/// Format the age of the last update ("just now", "12s ago", "3m ago").
pub fn format_age(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 1 {
        "just now".to_string()
    } else if secs < 60 {
        format!("{}s ago", secs)
    } else {
        format!("{}m ago", secs / 60)
    }
}

/// Serde adapter so intervals can be written as strings in config files.
pub mod serde_interval {
    use std::fmt;
    use std::time::Duration;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_interval(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        deserializer.deserialize_any(IntervalVisitor)
    }

    struct IntervalVisitor;

    impl<'de> Visitor<'de> for IntervalVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an interval such as \"2s\" or a number of milliseconds")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
            super::parse_interval(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
            Ok(Duration::from_millis(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
            u64::try_from(v)
                .map(Duration::from_millis)
                .map_err(|_| E::custom("interval must not be negative"))
        }
    }
}
