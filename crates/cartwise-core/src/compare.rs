//! Best-pick comparison over a snapshot of persisted deals.
//!
//! Pure and stateless: each call works over the deal slice it is given and
//! never mutates or caches anything.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::deal::Deal;

/// Result of comparing a shopping list against a deal snapshot.
#[derive(Debug, Serialize)]
pub struct ComparisonResult {
    /// The wanted items after normalization (trimmed, lowercased, empties dropped).
    pub requested_items: Vec<String>,
    /// One winning deal per wanted item that matched anything.
    pub picks: Vec<Deal>,
    pub total_items_found: usize,
    /// Sum of pick prices, rounded to 2 decimal places.
    pub estimated_total: Decimal,
    pub by_store: BTreeMap<String, StoreBreakdown>,
}

#[derive(Debug, Serialize)]
pub struct StoreBreakdown {
    pub items: Vec<String>,
    pub subtotal: Decimal,
}

/// Pick the best deal for each wanted item name.
///
/// Matching is a case-insensitive substring test against `Deal.item`. Among
/// matches, the winner minimizes `(unit_price, price)`, treating an unknown
/// unit price as larger than any known one — the cheapest per-unit offer wins
/// when quantities are known, with absolute price as the tie-break. A wanted
/// item with no matches contributes nothing.
#[must_use]
pub fn compare(wanted: &[String], deals: &[Deal]) -> ComparisonResult {
    let requested_items: Vec<String> = wanted
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    let mut picks: Vec<Deal> = Vec::new();
    for want in &requested_items {
        let best = deals
            .iter()
            .filter(|d| d.item.to_lowercase().contains(want.as_str()))
            .enumerate()
            .min_by_key(|(idx, d)| (d.unit_price().unwrap_or(Decimal::MAX), d.price, *idx))
            .map(|(_, d)| d);
        if let Some(deal) = best {
            picks.push(deal.clone());
        }
    }

    let estimated_total = picks
        .iter()
        .map(|p| p.price)
        .sum::<Decimal>()
        .round_dp(2);

    let mut by_store: BTreeMap<String, StoreBreakdown> = BTreeMap::new();
    for pick in &picks {
        let entry = by_store
            .entry(pick.store_id.clone())
            .or_insert_with(|| StoreBreakdown {
                items: Vec::new(),
                subtotal: Decimal::ZERO,
            });
        entry.items.push(pick.item.clone());
        entry.subtotal += pick.price;
    }

    ComparisonResult {
        total_items_found: picks.len(),
        estimated_total,
        requested_items,
        picks,
        by_store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::Unit;

    fn make_deal(store_id: &str, item: &str, price: &str, unit_qty: Option<&str>) -> Deal {
        let today = chrono::Utc::now().date_naive();
        Deal {
            store_id: store_id.to_owned(),
            item: item.to_owned(),
            size_text: String::new(),
            price: price.parse().unwrap(),
            unit_qty: unit_qty.map(|q| q.parse().unwrap()),
            unit: unit_qty.map(|_| Unit::Lb),
            start_date: today,
            end_date: today + chrono::Days::new(7),
            promo_text: "Weekly Ad".to_owned(),
            source: "https://example.com/ad".to_owned(),
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn picks_lowest_unit_price_over_lowest_absolute_price() {
        let deals = vec![
            make_deal("food-lion-24503", "Chicken Breast", "4.99", Some("1")),
            make_deal("food-lion-24503", "Whole Chicken", "8.99", Some("4")),
        ];
        let result = compare(&["chicken".to_owned()], &deals);
        assert_eq!(result.total_items_found, 1);
        // 8.99 / 4 = 2.2475 beats 4.99 / 1 despite the higher shelf price.
        assert_eq!(result.picks[0].item, "Whole Chicken");
        assert_eq!(result.estimated_total, "8.99".parse().unwrap());
    }

    #[test]
    fn unknown_unit_price_loses_to_known() {
        let deals = vec![
            make_deal("a", "Cheddar Cheese Block", "3.00", None),
            make_deal("b", "Cheddar Cheese Shredded", "5.00", Some("2")),
        ];
        let result = compare(&["cheddar".to_owned()], &deals);
        assert_eq!(result.picks[0].item, "Cheddar Cheese Shredded");
    }

    #[test]
    fn falls_back_to_cheapest_absolute_price() {
        let deals = vec![
            make_deal("a", "White Bread", "2.79", None),
            make_deal("b", "Wheat Bread", "2.19", None),
        ];
        let result = compare(&["bread".to_owned()], &deals);
        assert_eq!(result.picks[0].item, "Wheat Bread");
    }

    #[test]
    fn tie_on_unit_price_prefers_cheaper_absolute() {
        // Both 1.00/unit; the 2.00 package wins on absolute price.
        let deals = vec![
            make_deal("a", "Eggs Large", "4.00", Some("4")),
            make_deal("b", "Eggs Medium", "2.00", Some("2")),
        ];
        let result = compare(&["eggs".to_owned()], &deals);
        assert_eq!(result.picks[0].item, "Eggs Medium");
    }

    #[test]
    fn no_match_yields_empty_result() {
        let deals = vec![make_deal("a", "Milk", "3.49", None)];
        let result = compare(&["nonexistent-item".to_owned()], &deals);
        assert_eq!(result.total_items_found, 0);
        assert_eq!(result.estimated_total, Decimal::ZERO);
        assert!(result.by_store.is_empty());
        assert!(result.picks.is_empty());
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let deals = vec![make_deal("a", "Boneless CHICKEN Thighs", "5.49", None)];
        let result = compare(&["  Chicken ".to_owned()], &deals);
        assert_eq!(result.total_items_found, 1);
        assert_eq!(result.requested_items, vec!["chicken"]);
    }

    #[test]
    fn by_store_groups_picks_and_sums_subtotals() {
        let deals = vec![
            make_deal("food-lion-24503", "Milk", "3.49", None),
            make_deal("food-lion-24503", "Eggs", "2.99", None),
            make_deal("fresh-market-24503", "Salmon Fillet", "9.99", None),
        ];
        let wanted = vec!["milk".to_owned(), "eggs".to_owned(), "salmon".to_owned()];
        let result = compare(&wanted, &deals);
        assert_eq!(result.total_items_found, 3);
        assert_eq!(result.estimated_total, "16.47".parse().unwrap());

        let food_lion = &result.by_store["food-lion-24503"];
        assert_eq!(food_lion.items, vec!["Milk", "Eggs"]);
        assert_eq!(food_lion.subtotal, "6.48".parse().unwrap());

        let fresh_market = &result.by_store["fresh-market-24503"];
        assert_eq!(fresh_market.subtotal, "9.99".parse().unwrap());
    }

    #[test]
    fn blank_wanted_entries_are_dropped() {
        let deals = vec![make_deal("a", "Milk", "3.49", None)];
        let result = compare(&["  ".to_owned(), "milk".to_owned()], &deals);
        assert_eq!(result.requested_items, vec!["milk"]);
        assert_eq!(result.total_items_found, 1);
    }
}
