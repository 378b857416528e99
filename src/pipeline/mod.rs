//! Event-normalization and market-extraction pipeline.
//!
//! One pure, synchronous pass: raw upstream payload → canonical
//! fixtures → best qualifying price per wager type → two ranked lists.
//! Per-fixture failures are isolated — a malformed record is skipped
//! and the run continues. That is the core resilience contract.

pub mod timestamp;
pub mod extract;
pub mod markets;
pub mod filter;
pub mod rank;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, warn};

pub use timestamp::EpochUnit;

use crate::config::AppConfig;
use crate::types::{ScanOutcome, WagerType};

// ---------------------------------------------------------------------------
// Wager rule table
// ---------------------------------------------------------------------------

/// One entry in the wager rule table: which label substrings identify
/// the wager type and the minimum price to keep an offer.
#[derive(Debug, Clone)]
pub struct WagerRule {
    pub wager: WagerType,
    /// Lowercase substrings; a case-folded label matching ANY of them
    /// qualifies. Locale variants live here, not in code branches.
    pub patterns: Vec<String>,
    pub min_price: f64,
}

impl WagerRule {
    /// Whether a case-folded selection label identifies this wager.
    pub fn matches(&self, folded_label: &str) -> bool {
        self.patterns.iter().any(|p| folded_label.contains(p.as_str()))
    }
}

/// The default rule table: both tracked wager types with their fixed
/// business thresholds and known label variants.
pub fn default_rules() -> Vec<WagerRule> {
    vec![
        WagerRule {
            wager: WagerType::OverHalf,
            patterns: vec![
                "over 0.5".to_string(),
                "mais de 0.5".to_string(),
                "over0.5".to_string(),
                "+0.5".to_string(),
            ],
            min_price: 1.10,
        },
        WagerRule {
            wager: WagerType::OverOneHalf,
            patterns: vec![
                "over 1.5".to_string(),
                "mais de 1.5".to_string(),
                "over1.5".to_string(),
                "+1.5".to_string(),
            ],
            min_price: 1.50,
        },
    ]
}

// ---------------------------------------------------------------------------
// Scan configuration
// ---------------------------------------------------------------------------

/// Immutable per-run configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub window_hours: i64,
    pub epoch_unit: EpochUnit,
    pub display_offset_hours: i32,
    pub rules: Vec<WagerRule>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_hours: 24,
            epoch_unit: EpochUnit::Auto,
            display_offset_hours: -3,
            rules: default_rules(),
        }
    }
}

impl ScanConfig {
    /// Build from application config, overriding thresholds and falling
    /// back to `auto` on an unrecognized epoch unit.
    pub fn from_app(cfg: &AppConfig) -> Self {
        let epoch_unit = cfg.scanner.epoch_unit.parse().unwrap_or_else(|_| {
            warn!(
                epoch_unit = %cfg.scanner.epoch_unit,
                "Unrecognized epoch unit in config, falling back to auto"
            );
            EpochUnit::Auto
        });

        let mut rules = default_rules();
        for rule in &mut rules {
            rule.min_price = match rule.wager {
                WagerType::OverHalf => cfg.markets.over05_min_price,
                WagerType::OverOneHalf => cfg.markets.over15_min_price,
            };
        }

        Self {
            window_hours: cfg.scanner.window_hours,
            epoch_unit,
            display_offset_hours: cfg.scanner.display_offset_hours,
            rules,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload shape probing
// ---------------------------------------------------------------------------

/// Top-level keys under which providers nest their events array.
const EVENTS_KEYS: &[&str] = &["data", "events", "response", "fixtures", "results", "games"];

/// Locate the events array. A bare top-level array counts; anything
/// else unrecognized means zero events — valid output, not an error.
fn event_records(payload: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(events) = payload {
        return Some(events);
    }
    EVENTS_KEYS
        .iter()
        .find_map(|k| payload.get(k).and_then(Value::as_array))
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Run the full pipeline over one raw upstream payload.
pub fn run_scan(payload: &Value, now: DateTime<Utc>, cfg: &ScanConfig) -> ScanOutcome {
    let Some(events) = event_records(payload) else {
        warn!("Unrecognized payload shape — treating as zero events");
        return ScanOutcome::default();
    };

    let window = Duration::hours(cfg.window_hours);
    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut out_of_window = 0usize;

    for record in events {
        let Some(fixture) = extract::extract_fixture(record, cfg.epoch_unit) else {
            skipped += 1;
            continue;
        };

        // Time gate runs before market scanning.
        if !filter::in_window(fixture.kickoff, now, window) {
            out_of_window += 1;
            continue;
        }

        for offer in markets::scan_offers(record, &cfg.rules) {
            if filter::meets_threshold(&offer, &cfg.rules) {
                rows.push(rank::build_row(&fixture, &offer, cfg.display_offset_hours));
            }
        }
    }

    let outcome = rank::rank(rows);

    debug!(
        events = events.len(),
        skipped,
        out_of_window,
        over05 = outcome.over05.len(),
        over15 = outcome.over15.len(),
        "Scan complete"
    );

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
