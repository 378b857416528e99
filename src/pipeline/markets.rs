//! Market scanning.
//!
//! Walks a raw event record's nested market → selection structure,
//! matches selection labels against the wager rule table, and folds
//! the best (highest) qualifying price per wager type. Providers also
//! differ on where prices live: some nest them, some put flat
//! per-wager fields straight on the event — both are probed.

use serde_json::Value;

use super::WagerRule;
use crate::types::{MarketOffer, WagerType};

// ---------------------------------------------------------------------------
// Probe tables
// ---------------------------------------------------------------------------

/// Containers that hold market records on an event.
const MARKET_KEYS: &[&str] = &["markets", "odds", "bookmakers"];
/// Containers that hold selections within a market.
const SELECTION_KEYS: &[&str] = &["selections", "odds", "outcomes", "values"];
const LABEL_KEYS: &[&str] = &["label", "name", "selection", "header"];
const PRICE_KEYS: &[&str] = &["price", "priceDec", "odds", "priceDecimal", "value"];

/// Flat per-wager price fields on the event itself (one provider
/// variant skips the market nesting entirely).
const OVER_HALF_FLAT: &[&str] = &["odds_05", "oddsOver05", "over05"];
const OVER_ONE_HALF_FLAT: &[&str] = &["odds_15", "oddsOver15", "over15"];

fn flat_keys(wager: WagerType) -> &'static [&'static str] {
    match wager {
        WagerType::OverHalf => OVER_HALF_FLAT,
        WagerType::OverOneHalf => OVER_ONE_HALF_FLAT,
    }
}

// ---------------------------------------------------------------------------
// Price parsing
// ---------------------------------------------------------------------------

/// Parse a decimal-odds value from a JSON number or a locale-formatted
/// string (`"1,75"` and `"1.75"` both parse to 1.75). Odds at or below
/// 1.0 are meaningless and rejected.
pub fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse().ok()?,
        _ => return None,
    };
    (price > 1.0).then_some(price)
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Yield the best qualifying price per wager type for one event record.
///
/// Returns zero, one, or two offers. Aggregation is a max-fold across
/// every market and selection — never a first-match. Unparsable prices
/// skip the selection, nothing more.
pub fn scan_offers(record: &Value, rules: &[WagerRule]) -> Vec<MarketOffer> {
    let mut best: Vec<Option<f64>> = vec![None; rules.len()];

    for container in MARKET_KEYS {
        let Some(Value::Array(markets)) = record.get(container) else {
            continue;
        };
        for market in markets {
            // Market record with nested selection lists.
            for sel_key in SELECTION_KEYS {
                if let Some(Value::Array(selections)) = market.get(sel_key) {
                    for selection in selections {
                        fold_selection(selection, rules, &mut best);
                    }
                }
            }
            // Flat variant: the container holds selections directly.
            fold_selection(market, rules, &mut best);
        }
    }

    // Flat per-wager price fields on the event itself.
    for (i, rule) in rules.iter().enumerate() {
        for key in flat_keys(rule.wager) {
            if let Some(price) = record.get(key).and_then(parse_price) {
                fold_max(&mut best[i], price);
            }
        }
    }

    rules
        .iter()
        .zip(best)
        .filter_map(|(rule, price)| {
            price.map(|price| MarketOffer { wager: rule.wager, price })
        })
        .collect()
}

fn fold_selection(selection: &Value, rules: &[WagerRule], best: &mut [Option<f64>]) {
    let Some(label) = LABEL_KEYS
        .iter()
        .find_map(|k| selection.get(k))
        .and_then(Value::as_str)
    else {
        return;
    };

    let label = label.to_lowercase();
    let Some(price) = PRICE_KEYS
        .iter()
        .find_map(|k| selection.get(k).and_then(parse_price))
    else {
        return;
    };

    for (i, rule) in rules.iter().enumerate() {
        if rule.matches(&label) {
            fold_max(&mut best[i], price);
        }
    }
}

fn fold_max(slot: &mut Option<f64>, price: f64) {
    if slot.map_or(true, |current| price > current) {
        *slot = Some(price);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::default_rules;
    use serde_json::json;

    fn best_for(offers: &[MarketOffer], wager: WagerType) -> Option<f64> {
        offers.iter().find(|o| o.wager == wager).map(|o| o.price)
    }

    // -- parse_price tests --

    #[test]
    fn test_parse_price_number() {
        assert_eq!(parse_price(&json!(1.75)), Some(1.75));
    }

    #[test]
    fn test_parse_price_dot_string() {
        assert_eq!(parse_price(&json!("1.75")), Some(1.75));
    }

    #[test]
    fn test_parse_price_comma_string() {
        assert_eq!(parse_price(&json!("1,75")), Some(1.75));
    }

    #[test]
    fn test_parse_price_rejects_unity_and_below() {
        assert_eq!(parse_price(&json!(1.0)), None);
        assert_eq!(parse_price(&json!(0.85)), None);
        assert_eq!(parse_price(&json!("0,50")), None);
    }

    #[test]
    fn test_parse_price_garbage() {
        assert_eq!(parse_price(&json!("n/a")), None);
        assert_eq!(parse_price(&json!(null)), None);
        assert_eq!(parse_price(&json!([1.5])), None);
    }

    // -- scan_offers: nested structures --

    #[test]
    fn test_nested_market_selection_match() {
        let record = json!({
            "markets": [{
                "name": "Total Goals",
                "selections": [
                    { "label": "Over 0.5 Goals", "price": 1.30 },
                    { "label": "Under 0.5 Goals", "price": 3.20 },
                ],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.30));
        assert_eq!(best_for(&offers, WagerType::OverOneHalf), None);
    }

    #[test]
    fn test_locale_label_matches() {
        let record = json!({
            "odds": [{
                "values": [
                    { "name": "Mais de 1.5", "odds": "1,62" },
                ],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverOneHalf), Some(1.62));
    }

    #[test]
    fn test_compact_label_matches() {
        let record = json!({
            "markets": [{
                "outcomes": [{ "label": "OVER0.5", "priceDec": 1.18 }],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.18));
    }

    #[test]
    fn test_max_fold_across_selections() {
        let record = json!({
            "markets": [{
                "selections": [
                    { "label": "Over 0.5", "price": 1.20 },
                    { "label": "Over 0.5", "price": 1.35 },
                    { "label": "Over 0.5", "price": 1.25 },
                ],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.35));
    }

    #[test]
    fn test_max_fold_across_markets() {
        let record = json!({
            "bookmakers": [
                { "odds": [{ "label": "Over 1.5", "price": 1.55 }] },
                { "odds": [{ "label": "Over 1.5", "price": 1.70 }] },
            ],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverOneHalf), Some(1.70));
    }

    #[test]
    fn test_selections_directly_under_container() {
        // No market nesting: the container array holds selections.
        let record = json!({
            "odds": [
                { "label": "Over 0.5", "price": 1.22 },
            ],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.22));
    }

    #[test]
    fn test_unparsable_price_skips_selection_only() {
        let record = json!({
            "markets": [{
                "selections": [
                    { "label": "Over 0.5", "price": "soon" },
                    { "label": "Over 0.5", "price": 1.15 },
                ],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.15));
    }

    #[test]
    fn test_alternate_price_keys() {
        let record = json!({
            "markets": [{
                "selections": [
                    { "label": "Over 1.5", "priceDecimal": 1.58 },
                    { "label": "Over 0.5", "value": "1,12" },
                ],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverOneHalf), Some(1.58));
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.12));
    }

    #[test]
    fn test_flat_event_fields() {
        let record = json!({
            "odds_05": 1.15,
            "odds_15": "1,60",
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.15));
        assert_eq!(best_for(&offers, WagerType::OverOneHalf), Some(1.60));
    }

    #[test]
    fn test_flat_and_nested_fold_together() {
        let record = json!({
            "odds_05": 1.15,
            "markets": [{
                "selections": [{ "label": "Over 0.5", "price": 1.28 }],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.28));
    }

    #[test]
    fn test_no_qualifying_selection() {
        let record = json!({
            "markets": [{
                "selections": [
                    { "label": "Both Teams To Score", "price": 1.80 },
                    { "label": "Over 2.5", "price": 2.10 },
                ],
            }],
        });
        assert!(scan_offers(&record, &default_rules()).is_empty());
    }

    #[test]
    fn test_no_markets_at_all() {
        let record = json!({ "id": 1, "time": "2025-11-28 12:00:00" });
        assert!(scan_offers(&record, &default_rules()).is_empty());
    }

    #[test]
    fn test_at_most_one_offer_per_wager() {
        let record = json!({
            "markets": [{
                "selections": [
                    { "label": "Over 0.5", "price": 1.20 },
                    { "label": "over 0.5 goals", "price": 1.31 },
                    { "label": "Mais de 1.5", "price": 1.66 },
                ],
            }],
        });
        let offers = scan_offers(&record, &default_rules());
        assert_eq!(offers.len(), 2);
        assert_eq!(best_for(&offers, WagerType::OverHalf), Some(1.31));
        assert_eq!(best_for(&offers, WagerType::OverOneHalf), Some(1.66));
    }
}
