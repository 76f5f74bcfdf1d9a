//! Deal extraction: four strategies tried in priority order.
//!
//! The captured-network strategy is the most trustworthy when the site's own
//! API traffic was observed; embedded page-state JSON is next; the DOM card
//! query and the raw HTML sweep are progressively blunter instruments. The
//! orchestrator short-circuits on the first strategy that produces anything,
//! with one exception: a captured-JSON result below the confidence threshold
//! is held back and used only if every later strategy comes up empty.

mod captured;
mod cards;
mod embedded;
mod sweep;

use scraper::ElementRef;
use serde::Serialize;

use cartwise_core::{AppConfig, Deal};

use crate::builder::DealContext;
use crate::dedupe::dedupe;
use crate::render::RenderedPage;

/// Which extraction strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    CapturedJson,
    EmbeddedState,
    DomCards,
    HtmlSweep,
}

impl Strategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::CapturedJson => "captured_json",
            Strategy::EmbeddedState => "embedded_state",
            Strategy::DomCards => "dom_cards",
            Strategy::HtmlSweep => "html_sweep",
        }
    }
}

/// Tunables for one extraction pass.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Captured-JSON results below this count fall through to later
    /// strategies (kept as a fallback rather than discarded).
    pub min_captured_items: usize,
    /// Node budget per captured/embedded payload walk.
    pub max_walk_nodes: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_captured_items: 3,
            max_walk_nodes: 50_000,
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            min_captured_items: config.min_captured_items,
            max_walk_nodes: config.max_walk_nodes,
        }
    }
}

/// Outcome of one extraction pass: the deduplicated deals and the strategy
/// that produced them (`None` when everything came up empty).
#[derive(Debug)]
pub struct Extraction {
    pub deals: Vec<Deal>,
    pub strategy: Option<Strategy>,
}

/// Run the strategies in priority order over one rendered page.
#[must_use]
pub fn extract_deals(
    rendered: &RenderedPage,
    ctx: &DealContext<'_>,
    options: &ExtractOptions,
) -> Extraction {
    // Strategy 1: captured network JSON.
    let captured = captured::extract(&rendered.captured, ctx, options);
    if captured.len() >= options.min_captured_items {
        return finish(Strategy::CapturedJson, captured);
    }
    if !captured.is_empty() {
        tracing::debug!(
            count = captured.len(),
            threshold = options.min_captured_items,
            "captured-JSON result below confidence threshold; trying later strategies"
        );
    }

    // Strategy 2: embedded page-state JSON.
    let from_embedded = embedded::extract(&rendered.html, ctx, options);
    if !from_embedded.is_empty() {
        return finish(Strategy::EmbeddedState, from_embedded);
    }

    // Strategy 3: structured DOM query.
    let from_cards = cards::extract(&rendered.html, ctx);
    if !from_cards.is_empty() {
        return finish(Strategy::DomCards, from_cards);
    }

    // Strategy 4: raw HTML sweep.
    let from_sweep = sweep::extract(&rendered.html, ctx);
    if !from_sweep.is_empty() {
        return finish(Strategy::HtmlSweep, from_sweep);
    }

    // A thin captured result beats nothing at all.
    if !captured.is_empty() {
        tracing::debug!("falling back to thin captured-JSON result");
        return finish(Strategy::CapturedJson, captured);
    }

    tracing::warn!(source = ctx.source, "no extraction strategy produced any deals");
    Extraction {
        deals: vec![],
        strategy: None,
    }
}

fn finish(strategy: Strategy, deals: Vec<Deal>) -> Extraction {
    let deals = dedupe(deals);
    tracing::debug!(
        strategy = strategy.as_str(),
        count = deals.len(),
        "extraction strategy selected"
    );
    Extraction {
        deals,
        strategy: Some(strategy),
    }
}

/// Element text, flattened and whitespace-normalized.
fn flattened_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fallback display name: the text preceding the first currency symbol, when
/// long enough to be a plausible product name.
fn name_before_currency(text: &str) -> Option<String> {
    let idx = text.find('$')?;
    let name = text[..idx].trim();
    if name.chars().count() < 3 {
        return None;
    }
    Some(name.to_owned())
}
