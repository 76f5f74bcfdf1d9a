pub mod builder;
pub mod dedupe;
pub mod error;
pub mod extract;
pub mod money;
pub mod pipeline;
pub mod render;
pub mod unit;
mod walk;

pub use builder::{build_deal, DealContext, RawPrice};
pub use dedupe::dedupe;
pub use error::ScrapeError;
pub use extract::{extract_deals, ExtractOptions, Extraction, Strategy};
pub use pipeline::{scrape_store, ScrapeSummary};
pub use render::{
    CapturedResponse, HttpRenderer, RenderConfig, RenderError, RenderedPage, Renderer,
};
