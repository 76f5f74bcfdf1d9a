//! Strategy 3: structured query over the rendered DOM.
//!
//! Two passes over the snapshot: containers carrying known card classes, then
//! standalone price-classed nodes that climb a few ancestor levels looking
//! for a heading to name them. Generic block elements are deliberately left
//! to the raw sweep — this strategy only fires on pages with recognizable
//! card markup. Candidates are deduplicated by `(name lowercased, price)` at
//! this layer before they reach the builder.

use std::collections::HashSet;

use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use cartwise_core::Deal;

use crate::builder::{build_deal, DealContext, RawPrice};
use crate::{money, unit};

use super::{flattened_text, name_before_currency};

const CARD_SELECTOR: &str = ".c-card, .card, .grid__item";
const HEADING_SELECTOR: &str = "h1, h2, h3, h4, strong, .title, .card__title";
const PRICE_CLASS_SELECTOR: &str = r#"[class*="price"], [class*="Price"]"#;
const MAX_ANCESTOR_CLIMB: usize = 4;

pub(super) fn extract(html: &str, ctx: &DealContext<'_>) -> Vec<Deal> {
    let document = Html::parse_document(html);
    let heading_selector = Selector::parse(HEADING_SELECTOR).expect("valid selector");

    let mut seen: HashSet<(String, Decimal)> = HashSet::new();
    let mut out = Vec::new();

    let card_selector = Selector::parse(CARD_SELECTOR).expect("valid selector");
    for card in document.select(&card_selector) {
        let text = flattened_text(card);
        if !text.contains('$') {
            continue;
        }
        let Some(price) = money::parse(&text) else {
            continue;
        };
        let Some(name) =
            heading_name(card, &heading_selector).or_else(|| name_before_currency(&text))
        else {
            continue;
        };
        push_candidate(ctx, &mut seen, &mut out, &name, price, &text);
    }

    // Second pass: price-classed leaf nodes whose card markup did not match
    // any container tier. Climb toward the root looking for a heading.
    let price_selector = Selector::parse(PRICE_CLASS_SELECTOR).expect("valid selector");
    for node in document.select(&price_selector) {
        let node_text = flattened_text(node);
        let Some(price) = money::parse(&node_text) else {
            continue;
        };
        let name = node
            .ancestors()
            .take(MAX_ANCESTOR_CLIMB)
            .filter_map(ElementRef::wrap)
            .find_map(|ancestor| heading_name(ancestor, &heading_selector));
        let Some(name) = name else {
            continue;
        };
        push_candidate(ctx, &mut seen, &mut out, &name, price, &node_text);
    }

    out
}

fn heading_name(scope: ElementRef<'_>, heading_selector: &Selector) -> Option<String> {
    scope
        .select(heading_selector)
        .map(flattened_text)
        .find(|t| !t.contains('$') && t.chars().count() > 2)
}

fn push_candidate(
    ctx: &DealContext<'_>,
    seen: &mut HashSet<(String, Decimal)>,
    out: &mut Vec<Deal>,
    name: &str,
    price: Decimal,
    context_text: &str,
) {
    if !seen.insert((name.to_lowercase(), price)) {
        return;
    }
    let size = unit::size_hint(context_text).unwrap_or("");
    if let Some(deal) = build_deal(ctx, name, RawPrice::Text(context_text), size) {
        out.push(deal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DealContext<'static> {
        DealContext {
            store_id: "fresh-market-24503",
            source: "https://example.com/ad",
            promo_text: "Weekly Features",
        }
    }

    #[test]
    fn extracts_named_cards_with_prices() {
        let html = r#"
            <html><body>
              <div class="card">
                <h3>Atlantic Salmon</h3>
                <span>$9.99 per lb</span>
              </div>
              <div class="card">
                <h3>Organic Blueberries</h3>
                <span>2 for $7</span>
                <span>$4.50 each</span>
              </div>
            </body></html>
        "#;
        let deals = extract(html, &ctx());
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].item, "Atlantic Salmon");
        assert_eq!(deals[0].price, "9.99".parse().unwrap());
        assert_eq!(deals[0].size_text, "per lb");
        // The multi-buy offer is the first currency-looking substring.
        assert_eq!(deals[1].price, "3.50".parse().unwrap());
    }

    #[test]
    fn falls_back_to_text_before_currency_symbol() {
        let html = r#"<ul><li class="grid__item">Honeycrisp Apples $2.49</li></ul>"#;
        let deals = extract(html, &ctx());
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].item, "Honeycrisp Apples");
    }

    #[test]
    fn generic_blocks_without_card_classes_are_left_to_the_sweep() {
        let html = "<html><body><div>Milk 1 Gallon $3.49</div></body></html>";
        assert!(extract(html, &ctx()).is_empty());
    }

    #[test]
    fn price_node_climbs_to_heading_sibling() {
        let html = r#"
            <html><body>
              <section>
                <h2>Rotisserie Chicken</h2>
                <div><span class="sale-price">$6.99</span></div>
              </section>
            </body></html>
        "#;
        let deals = extract(html, &ctx());
        assert!(deals.iter().any(|d| d.item == "Rotisserie Chicken"
            && d.price == "6.99".parse().unwrap()));
    }

    #[test]
    fn duplicate_candidates_collapse_within_the_layer() {
        // The same card matches both ".card" and the price-class pass.
        let html = r#"
            <div class="card">
              <h3>Atlantic Salmon</h3>
              <span class="price">$9.99</span>
            </div>
        "#;
        let deals = extract(html, &ctx());
        assert_eq!(deals.len(), 1);
    }

    #[test]
    fn cards_without_prices_are_ignored() {
        let html = r#"<div class="card"><h3>Banner Headline</h3><p>Shop now</p></div>"#;
        assert!(extract(html, &ctx()).is_empty());
    }

    #[test]
    fn page_without_currency_yields_nothing() {
        assert!(extract("<html><body><p>hello</p></body></html>", &ctx()).is_empty());
    }
}
