//! Candidate validation and assembly into canonical [`Deal`] records.

use chrono::{Days, Utc};
use rust_decimal::Decimal;

use cartwise_core::Deal;

use crate::{money, unit};

/// Maximum stored length of a deal's display name.
pub const MAX_ITEM_LEN: usize = 120;
/// Minimum display-name length after trimming.
pub const MIN_ITEM_LEN: usize = 3;

const PROMO_WINDOW_DAYS: u64 = 7;

/// Per-scrape constants stamped onto every deal built during one extraction
/// pass.
#[derive(Debug, Clone, Copy)]
pub struct DealContext<'a> {
    pub store_id: &'a str,
    /// Origin URL of the page being extracted.
    pub source: &'a str,
    /// Campaign label for this store, e.g. `"Weekly Ad"`.
    pub promo_text: &'a str,
}

/// A raw price as found in source data: free text, or a JSON value from a
/// captured payload.
#[derive(Debug, Clone, Copy)]
pub enum RawPrice<'a> {
    Text(&'a str),
    Json(&'a serde_json::Value),
}

/// Assemble a [`Deal`] from a raw candidate, or reject it.
///
/// Rejection is silent (`None`): strategies scan thousands of low-quality
/// DOM/JSON nodes and most candidates are expected to fail here. A candidate
/// is rejected when its price does not parse to a positive amount or its
/// trimmed name is shorter than [`MIN_ITEM_LEN`]. Names are truncated to
/// [`MAX_ITEM_LEN`]; the unit extractor runs over the size hint and the name
/// combined; the promo window defaults to today through today + 7 days.
#[must_use]
pub fn build_deal(
    ctx: &DealContext<'_>,
    raw_name: &str,
    raw_price: RawPrice<'_>,
    raw_size: &str,
) -> Option<Deal> {
    let price = match raw_price {
        RawPrice::Text(text) => money::parse(text),
        RawPrice::Json(value) => money::from_json(value),
    }?;
    if price <= Decimal::ZERO {
        return None;
    }

    let name = raw_name.trim();
    if name.chars().count() < MIN_ITEM_LEN {
        return None;
    }
    let item: String = name.chars().take(MAX_ITEM_LEN).collect();

    let size_text = raw_size.trim().to_owned();
    let (unit_qty, unit) = unit::extract(&format!("{size_text} {item}"));

    let fetched_at = Utc::now();
    let start_date = fetched_at.date_naive();
    let end_date = start_date + Days::new(PROMO_WINDOW_DAYS);

    Some(Deal {
        store_id: ctx.store_id.to_owned(),
        item,
        size_text,
        price,
        unit_qty,
        unit,
        start_date,
        end_date,
        promo_text: ctx.promo_text.to_owned(),
        source: ctx.source.to_owned(),
        fetched_at,
    })
}
