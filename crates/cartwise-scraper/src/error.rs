use thiserror::Error;

use crate::render::RenderError;

/// Fatal failures of a scrape invocation.
///
/// Everything else that goes wrong during extraction (malformed JSON,
/// unparseable prices, odd DOM shapes) is recovered per-candidate and never
/// surfaces here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("persistence failed: {0}")]
    Persist(#[from] cartwise_store::StoreError),
}
