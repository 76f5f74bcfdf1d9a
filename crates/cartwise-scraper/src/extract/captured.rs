//! Strategy 1: mine JSON responses captured during page render.

use cartwise_core::Deal;

use crate::builder::DealContext;
use crate::render::CapturedResponse;
use crate::walk::walk_value;

use super::ExtractOptions;

pub(super) fn extract(
    captured: &[CapturedResponse],
    ctx: &DealContext<'_>,
    options: &ExtractOptions,
) -> Vec<Deal> {
    let mut out = Vec::new();
    for response in captured {
        let mut budget = options.max_walk_nodes;
        walk_value(&response.body, ctx, &mut budget, &mut out);
        if budget == 0 {
            tracing::debug!(
                url = %response.url,
                "captured payload exhausted the walk budget; remainder skipped"
            );
        }
    }
    out
}
