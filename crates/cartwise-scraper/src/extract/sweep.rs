//! Strategy 4: raw HTML heuristic sweep, the last resort.
//!
//! Walks every block-level element; anything whose flattened text carries a
//! currency symbol and parses to a price is a candidate. High recall, low
//! precision — nested containers repeat the same offer and the orchestrator's
//! dedup pass is what keeps the output sane.

use scraper::{Html, Selector};

use cartwise_core::Deal;

use crate::builder::{build_deal, DealContext, RawPrice};
use crate::{money, unit};

use super::{flattened_text, name_before_currency};

const BLOCK_SELECTOR: &str = "article, div, li, section";
const NAME_SELECTOR: &str = "h2, h3, h4, p, div";

pub(super) fn extract(html: &str, ctx: &DealContext<'_>) -> Vec<Deal> {
    let document = Html::parse_document(html);
    let block_selector = Selector::parse(BLOCK_SELECTOR).expect("valid selector");
    let name_selector = Selector::parse(NAME_SELECTOR).expect("valid selector");

    let mut out = Vec::new();
    for block in document.select(&block_selector) {
        let text = flattened_text(block);
        if !text.contains('$') {
            continue;
        }
        if money::parse(&text).is_none() {
            continue;
        }

        let name = block
            .select(&name_selector)
            .map(flattened_text)
            .find(|t| !t.contains('$') && t.chars().count() > 2)
            .or_else(|| name_before_currency(&text));
        let Some(name) = name else {
            continue;
        };

        let size = unit::size_hint(&text).unwrap_or("");
        if let Some(deal) = build_deal(ctx, &name, RawPrice::Text(&text), size) {
            out.push(deal);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DealContext<'static> {
        DealContext {
            store_id: "food-lion-24503",
            source: "https://example.com/ad",
            promo_text: "Weekly Ad",
        }
    }

    #[test]
    fn bare_div_with_price_becomes_a_candidate() {
        let deals = extract("<div>Milk 1 Gallon $3.49</div>", &ctx());
        assert_eq!(deals.len(), 1);
        assert!(deals[0].item.starts_with("Milk"));
        assert_eq!(deals[0].price, "3.49".parse().unwrap());
    }

    #[test]
    fn name_prefers_currency_free_descendant() {
        let html = r#"
            <article>
              <h3>Boneless Chicken Breast</h3>
              <p>$4.99 per lb</p>
            </article>
        "#;
        let deals = extract(html, &ctx());
        assert_eq!(deals[0].item, "Boneless Chicken Breast");
        assert_eq!(deals[0].size_text, "per lb");
    }

    #[test]
    fn nested_blocks_repeat_candidates_for_downstream_dedup() {
        let html = "<div><div>Milk 1 Gallon $3.49</div></div>";
        let deals = extract(html, &ctx());
        // Both the outer and inner container match; dedup happens later.
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].item, deals[1].item);
    }

    #[test]
    fn blocks_without_currency_are_skipped() {
        assert!(extract("<div>Fresh produce daily</div>", &ctx()).is_empty());
    }

    #[test]
    fn short_fallback_name_is_rejected() {
        assert!(extract("<div>ab $3.49</div>", &ctx()).is_empty());
    }
}
