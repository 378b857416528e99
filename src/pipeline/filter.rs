//! Window and threshold gates.
//!
//! Two independent gates, both required: the time gate keeps fixtures
//! whose kickoff lies in `(now, now + window]`, and the price gate
//! keeps offers meeting the wager type's minimum price. Thresholds are
//! business constants carried in the `WagerRule` table, never derived.

use chrono::{DateTime, Duration, Utc};

use super::WagerRule;
use crate::types::MarketOffer;

/// Time gate. Lower bound exclusive (already-started fixtures are
/// out), upper bound inclusive.
pub fn in_window(kickoff: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    kickoff > now && kickoff <= now + window
}

/// Price gate. An offer with no matching rule never passes.
pub fn meets_threshold(offer: &MarketOffer, rules: &[WagerRule]) -> bool {
    rules
        .iter()
        .find(|r| r.wager == offer.wager)
        .map_or(false, |r| offer.price >= r.min_price)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
