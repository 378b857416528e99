//! Result rows and ranking.
//!
//! Builds display rows from kept offers and emits the two named lists,
//! each stable-sorted by price descending so upstream order breaks
//! ties.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::types::{Fixture, MarketOffer, ResultRow, ScanOutcome, WagerType};

/// Round decimal odds to 2 places for output.
pub fn round2(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Format a kickoff as `HH:MM` shifted into the configured fixed
/// display offset (e.g. -3 for BRT).
pub fn display_time(kickoff: DateTime<Utc>, offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(offset_hours * 3600)
        .unwrap_or_else(|| Utc.fix());
    kickoff.with_timezone(&offset).format("%H:%M").to_string()
}

/// Build one output row from a fixture and a kept offer.
pub fn build_row(fixture: &Fixture, offer: &MarketOffer, offset_hours: i32) -> ResultRow {
    ResultRow {
        wager: offer.wager,
        kickoff_display: display_time(fixture.kickoff, offset_hours),
        participants: fixture.participants.clone(),
        competition: fixture.competition.clone(),
        price: round2(offer.price),
    }
}

/// Partition rows by wager type and stable-sort each list by price
/// descending.
pub fn rank(rows: Vec<ResultRow>) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    for row in rows {
        match row.wager {
            WagerType::OverHalf => outcome.over05.push(row),
            WagerType::OverOneHalf => outcome.over15.push(row),
        }
    }

    // Vec::sort_by is stable, so equal prices keep upstream order.
    let by_price_desc = |a: &ResultRow, b: &ResultRow| {
        b.price
            .partial_cmp(&a.price)
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    outcome.over05.sort_by(by_price_desc);
    outcome.over15.sort_by(by_price_desc);

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
