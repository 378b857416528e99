//! Fixture extraction.
//!
//! Upstream event records are duck-typed maps with provider-specific
//! field names. Each logical field has an ordered alias table; the
//! first present key wins. Values may be plain strings, numbers, or
//! objects carrying a `name` (SoccersAPI nests `home: { name: ... }`).
//!
//! A record with no kickoff under any alias is incomplete and yields
//! `None` — excluded entirely, never defaulted.

use serde_json::Value;

use super::timestamp::{self, EpochUnit};
use crate::types::Fixture;

// ---------------------------------------------------------------------------
// Field alias tables
// ---------------------------------------------------------------------------

const ID_KEYS: &[&str] = &["id", "event_id", "fixture_id", "match_id"];
const KICKOFF_KEYS: &[&str] = &["time_start", "start_time", "starting_at", "kickoff", "time", "date"];
/// Pre-combined participant strings ("Home vs Away") — preserved as-is.
const COMBINED_KEYS: &[&str] = &["teams", "times", "match"];
const HOME_KEYS: &[&str] = &["home", "home_team", "homeTeam", "localteam"];
const AWAY_KEYS: &[&str] = &["away", "away_team", "awayTeam", "visitorteam"];
const COMPETITION_KEYS: &[&str] = &["league", "competition", "campeonato", "tournament"];

/// Separator used when joining separate home/away fields.
pub const TEAM_SEPARATOR: &str = " vs ";

// ---------------------------------------------------------------------------
// Probing helpers
// ---------------------------------------------------------------------------

/// First present value under any of the alias keys.
fn probe<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| record.get(k))
}

/// Coerce a value to display text: strings pass through (trimmed),
/// numbers are stringified, objects are probed for a `name` field.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get("name").and_then(text_value),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Map one raw event record to a canonical `Fixture`.
///
/// Pure transform: no logging, no side effects. `None` means the
/// record had no usable kickoff time.
pub fn extract_fixture(record: &Value, unit: EpochUnit) -> Option<Fixture> {
    let kickoff = probe(record, KICKOFF_KEYS)
        .and_then(|v| timestamp::normalize(v, unit))?;

    let id = probe(record, ID_KEYS).and_then(text_value);

    let participants = probe(record, COMBINED_KEYS)
        .and_then(text_value)
        .or_else(|| {
            let home = probe(record, HOME_KEYS).and_then(text_value)?;
            let away = probe(record, AWAY_KEYS).and_then(text_value)?;
            Some(format!("{home}{TEAM_SEPARATOR}{away}"))
        })
        .unwrap_or_default();

    let competition = probe(record, COMPETITION_KEYS)
        .and_then(text_value)
        .unwrap_or_default();

    Some(Fixture { id, participants, competition, kickoff })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
