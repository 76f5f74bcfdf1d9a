//! One full scrape of one store: render, dump diagnostics, extract, persist.

use serde::Serialize;

use cartwise_core::StoreConfig;
use cartwise_store::DealStore;

use crate::builder::DealContext;
use crate::error::ScrapeError;
use crate::extract::{extract_deals, ExtractOptions, Strategy};
use crate::render::{RenderConfig, Renderer};

/// What one scrape invocation accomplished.
#[derive(Debug, Serialize)]
pub struct ScrapeSummary {
    pub store_id: String,
    pub slug: String,
    /// Strategy that produced the persisted deals; `None` when every
    /// strategy came up empty (an empty collection is still persisted).
    pub strategy: Option<Strategy>,
    pub saved_items: usize,
}

/// Scrape one store's weekly-ad page and replace its persisted collection.
///
/// The store's dismissal selectors and scroll-nudge flag are layered onto the
/// base render config. Debug artifacts (HTML snapshot, screenshot when the
/// renderer took one, captured-JSON dump) are written unconditionally, before
/// extraction, so a run that parses nothing still leaves something to inspect;
/// artifact write failures are logged and do not abort the scrape.
///
/// # Errors
///
/// Returns [`ScrapeError::Render`] when the page cannot be rendered — the
/// prior persisted collection is left untouched — and [`ScrapeError::Persist`]
/// when the deal collection itself cannot be written.
pub async fn scrape_store<R: Renderer + ?Sized>(
    renderer: &R,
    store: &StoreConfig,
    base_render: &RenderConfig,
    options: &ExtractOptions,
    deal_store: &DealStore,
) -> Result<ScrapeSummary, ScrapeError> {
    let mut render_config = base_render.clone();
    render_config.dismiss_selectors = store.dismiss_selectors.clone();
    render_config.scroll_nudge = store.scroll_nudge;

    let slug = store.slug();
    tracing::info!(slug, url = %store.ad_url, "scraping store");

    let page = renderer.render(&store.ad_url, &render_config).await?;

    if let Err(e) = deal_store.save_debug_html(&slug, &page.html) {
        tracing::warn!(slug, error = %e, "failed to write debug HTML");
    }
    if let Some(screenshot) = &page.screenshot {
        if let Err(e) = deal_store.save_screenshot(&slug, screenshot) {
            tracing::warn!(slug, error = %e, "failed to write screenshot");
        }
    }
    if let Err(e) = deal_store.save_captured_dump(&slug, &page.captured) {
        tracing::warn!(slug, error = %e, "failed to write captured-JSON dump");
    }

    let ctx = DealContext {
        store_id: &store.store_id,
        source: &store.ad_url,
        promo_text: &store.promo_text,
    };
    let extraction = extract_deals(&page, &ctx, options);

    let saved_items = deal_store.save_deals(&slug, &extraction.deals)?;
    tracing::info!(
        slug,
        saved_items,
        strategy = extraction.strategy.map(Strategy::as_str),
        "scrape complete"
    );

    Ok(ScrapeSummary {
        store_id: store.store_id.clone(),
        slug,
        strategy: extraction.strategy,
        saved_items,
    })
}
