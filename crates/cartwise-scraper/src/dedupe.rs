//! Stable deduplication of extracted deal candidates.

use std::collections::HashSet;

use rust_decimal::Decimal;

use cartwise_core::Deal;

/// Collapse repeated `(item lowercased, price)` candidates, keeping the first
/// occurrence of each key and preserving input order. Idempotent.
#[must_use]
pub fn dedupe(deals: Vec<Deal>) -> Vec<Deal> {
    let mut seen: HashSet<(String, Decimal)> = HashSet::new();
    deals
        .into_iter()
        .filter(|deal| seen.insert((deal.item.to_lowercase(), deal.price)))
        .collect()
}
