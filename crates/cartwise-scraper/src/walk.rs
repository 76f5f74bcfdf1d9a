//! Recursive walk over arbitrary JSON payloads looking for product/price
//! pairs.
//!
//! Shared by the captured-network and embedded-page-state strategies. JSON
//! trees are acyclic so the recursion always terminates, but payloads can be
//! arbitrarily large — a per-payload node budget bounds total work, and an
//! exhausted budget stops further descent into that payload only.

use serde_json::Value;

use cartwise_core::Deal;

use crate::builder::{build_deal, DealContext, RawPrice};
use crate::money;

const NAME_KEYS: [&str; 5] = ["name", "title", "headline", "productName", "product_name"];
const PRICE_KEYS: [&str; 5] = ["price", "salePrice", "sale_price", "amount", "value"];
const SIZE_KEYS: [&str; 3] = ["unit", "uom", "size"];

/// Walk `value` depth-first, emitting a deal candidate at every object node
/// that carries both a name-like and a parseable price-like field.
///
/// `budget` is decremented per visited node; at zero the walk returns without
/// descending further.
pub(crate) fn walk_value(
    value: &Value,
    ctx: &DealContext<'_>,
    budget: &mut usize,
    out: &mut Vec<Deal>,
) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;

    match value {
        Value::Object(map) => {
            let name = NAME_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str));
            let price_value = PRICE_KEYS
                .iter()
                .find_map(|key| map.get(*key).filter(|v| money::from_json(v).is_some()))
                .or_else(|| offers_price(map));

            if let (Some(name), Some(price_value)) = (name, price_value) {
                let size = SIZE_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .unwrap_or("");
                if let Some(deal) = build_deal(ctx, name, RawPrice::Json(price_value), size) {
                    out.push(deal);
                }
            }

            for child in map.values() {
                walk_value(child, ctx, budget, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_value(item, ctx, budget, out);
            }
        }
        _ => {}
    }
}

/// Probe one level into a schema.org-style `offers` child, where the price
/// lives apart from the product name (`{"name": …, "offers": {"price": …}}`).
fn offers_price(map: &serde_json::Map<String, Value>) -> Option<&Value> {
    let offers = map.get("offers")?;
    let offer = match offers {
        Value::Array(items) => items.first()?,
        other => other,
    };
    PRICE_KEYS
        .iter()
        .find_map(|key| offer.get(*key).filter(|v| money::from_json(v).is_some()))
}
