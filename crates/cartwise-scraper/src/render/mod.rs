//! The page-render capability consumed by the scrape pipeline.
//!
//! Rendering a retailer's ad page is collaborator territory: the pipeline
//! only needs `render(url) -> html + captured responses + screenshot` and a
//! single error when that fails. Browser-backed implementations honor the
//! banner-dismissal and scroll-nudge options; the bundled [`HttpRenderer`]
//! fetches static HTML and ignores them.

mod http;

use serde::Serialize;

pub use http::HttpRenderer;

/// Errors that can occur while rendering a page.
///
/// Any of these aborts the whole scrape for that store; no partial HTML is
/// considered valid.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no usable content from {url} after {attempts} attempts")]
    AllAttemptsFailed { url: String, attempts: usize },
}

/// Options for rendering a page.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Navigation/request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Cookie/consent banner selectors to dismiss, best effort.
    pub dismiss_selectors: Vec<String>,
    /// Scroll the page to trigger lazy-loaded sections.
    pub scroll_nudge: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 45,
            user_agent: "cartwise/0.1 (deal-aggregator)".to_owned(),
            dismiss_selectors: vec![],
            scroll_nudge: false,
        }
    }
}

/// A network JSON response observed while the page rendered. Kept only for
/// the duration of one extraction pass (plus the on-disk diagnostic dump).
#[derive(Debug, Clone, Serialize)]
pub struct CapturedResponse {
    pub url: String,
    pub content_type: String,
    pub body: serde_json::Value,
}

/// Everything one render pass produced.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub captured: Vec<CapturedResponse>,
    pub screenshot: Option<Vec<u8>>,
}

/// Turns a URL into a rendered page snapshot.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Render `url` and return the final HTML plus anything captured along
    /// the way.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the page cannot be fetched or produces no
    /// usable content; callers must treat that as fatal for the scrape.
    async fn render(&self, url: &str, config: &RenderConfig) -> Result<RenderedPage, RenderError>;
}
