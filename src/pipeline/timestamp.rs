//! Timestamp normalization.
//!
//! Upstream variants encode kickoff times as epoch milliseconds, epoch
//! seconds, RFC-3339 strings (with or without a zone suffix), or naive
//! `YYYY-MM-DD HH:MM:SS` strings. Everything collapses to
//! `DateTime<Utc>` here; anything unrecognized yields `None`, never an
//! error — the caller excludes the fixture.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// How numeric kickoff values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpochUnit {
    Millis,
    Seconds,
    /// Magnitude heuristic: values at or above `MILLIS_THRESHOLD` are
    /// millis, everything below is seconds.
    #[default]
    Auto,
}

/// 10^11: ≈ year 5138 as seconds, 1973 as millis. Fixture schedules
/// never straddle that, so the heuristic is unambiguous in practice.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

impl std::str::FromStr for EpochUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "millis" | "milliseconds" | "ms" => Ok(EpochUnit::Millis),
            "seconds" | "secs" | "s" => Ok(EpochUnit::Seconds),
            "auto" => Ok(EpochUnit::Auto),
            _ => Err(anyhow::anyhow!("Unknown epoch unit: {s}")),
        }
    }
}

/// Normalize one raw kickoff value to absolute UTC.
///
/// Accepts JSON numbers (epoch per `unit`), all-digit strings (same),
/// and datetime strings. Returns `None` for anything else.
pub fn normalize(value: &Value, unit: EpochUnit) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            from_epoch(raw, unit)
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if s.chars().all(|c| c.is_ascii_digit()) {
                return from_epoch(s.parse().ok()?, unit);
            }
            parse_datetime_str(s)
        }
        _ => None,
    }
}

fn from_epoch(raw: i64, unit: EpochUnit) -> Option<DateTime<Utc>> {
    let millis = match unit {
        EpochUnit::Millis => raw,
        EpochUnit::Seconds => raw.checked_mul(1000)?,
        EpochUnit::Auto => {
            if raw.abs() >= MILLIS_THRESHOLD {
                raw
            } else {
                raw.checked_mul(1000)?
            }
        }
    };
    Utc.timestamp_millis_opt(millis).single()
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    // RFC-3339 covers the `Z` suffix and explicit offsets.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Zone-less variants are treated as UTC.
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
