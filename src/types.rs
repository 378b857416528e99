//! Shared types for the OVERSCAN service.
//!
//! These types form the canonical data model produced by the
//! normalization pipeline. All of them are request-scoped: they exist
//! for the duration of one scan and are discarded with the response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Wager types
// ---------------------------------------------------------------------------

/// The fixed set of wager types this service tracks.
///
/// Extending the set means adding a variant here and an entry to the
/// `WagerRule` table in the pipeline — never a new code branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerType {
    #[serde(rename = "Over 0.5")]
    OverHalf,
    #[serde(rename = "Over 1.5")]
    OverOneHalf,
}

impl WagerType {
    /// All known wager types, in output declaration order.
    pub const ALL: &'static [WagerType] = &[WagerType::OverHalf, WagerType::OverOneHalf];

    /// Human-readable market label.
    pub fn label(&self) -> &'static str {
        match self {
            WagerType::OverHalf => "Over 0.5",
            WagerType::OverOneHalf => "Over 1.5",
        }
    }
}

impl fmt::Display for WagerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for WagerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(' ', "").as_str() {
            "over0.5" | "over05" | "0.5" => Ok(WagerType::OverHalf),
            "over1.5" | "over15" | "1.5" => Ok(WagerType::OverOneHalf),
            _ => Err(anyhow::anyhow!("Unknown wager type: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// One scheduled match, normalized from whatever shape the upstream
/// provider delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Upstream identifier, stored as text regardless of source type.
    /// Some providers omit it entirely.
    pub id: Option<String>,
    /// Combined participant string, e.g. `"Santos vs Flamengo"`.
    /// Pre-combined upstream strings are preserved as-is.
    pub participants: String,
    /// Free-text league/competition name; empty when absent.
    pub competition: String,
    /// Kickoff time, always absolute UTC.
    pub kickoff: DateTime<Utc>,
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) @ {}",
            self.participants,
            if self.competition.is_empty() { "?" } else { &self.competition },
            self.kickoff.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

impl Fixture {
    /// Whether kickoff lies in `(now, now + window]` — strictly in the
    /// future (already-started matches excluded) and at most `window`
    /// away (inclusive).
    pub fn starts_within(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        self.kickoff > now && self.kickoff <= now + window
    }
}

// ---------------------------------------------------------------------------
// Market offer
// ---------------------------------------------------------------------------

/// The best qualifying price found for one wager type on one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketOffer {
    pub wager: WagerType,
    /// Decimal odds. Anything at or below 1.0 pays less than the stake
    /// and is rejected at parse time.
    pub price: f64,
}

impl fmt::Display for MarketOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.2}", self.wager, self.price)
    }
}

// ---------------------------------------------------------------------------
// Result rows & outcome
// ---------------------------------------------------------------------------

/// One output row: fixture + wager + best price, in the wire format the
/// frontend consumes (field names kept from the original contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "mercado")]
    pub wager: WagerType,
    /// Kickoff as `HH:MM` in the configured display offset.
    #[serde(rename = "hora")]
    pub kickoff_display: String,
    #[serde(rename = "times")]
    pub participants: String,
    #[serde(rename = "campeonato")]
    pub competition: String,
    /// Decimal odds, rounded to 2 places.
    #[serde(rename = "odd")]
    pub price: f64,
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} ({}) @ {:.2}",
            self.wager, self.kickoff_display, self.participants, self.competition, self.price,
        )
    }
}

/// The two ranked lists produced by one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub over05: Vec<ResultRow>,
    pub over15: Vec<ResultRow>,
}

impl ScanOutcome {
    /// Total rows across both lists.
    pub fn len(&self) -> usize {
        self.over05.len() + self.over15.len()
    }

    pub fn is_empty(&self) -> bool {
        self.over05.is_empty() && self.over15.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain error taxonomy.
///
/// Per-item problems (missing kickoff, unparsable price) are never
/// errors — they surface as skipped values inside the pipeline. Only
/// request-level failures live here.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Upstream provider unreachable, timed out, or returned non-2xx /
    /// unparsable body. Mapped to a gateway error at the HTTP layer.
    #[error("Upstream provider error: {message}")]
    Upstream { message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
