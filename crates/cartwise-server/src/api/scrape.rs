use axum::{
    extract::{Path, State},
    Extension, Json,
};

use cartwise_scraper::{scrape_store, ScrapeError, ScrapeSummary};

use crate::middleware::RequestId;

use super::{find_store, ApiError, ApiResponse, AppState, ResponseMeta};

/// Run a full scrape for one store and replace its persisted collection.
///
/// Renderer failure maps to `bad_gateway`: the upstream retail site, not this
/// service, is what broke. The prior snapshot stays authoritative in that
/// case.
pub(super) async fn trigger_scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ScrapeSummary>>, ApiError> {
    let store = find_store(&state.stores, &slug).ok_or_else(|| {
        ApiError::new(req_id.0.clone(), "not_found", format!("unknown store '{slug}'"))
    })?;

    let summary = scrape_store(
        state.renderer.as_ref(),
        store,
        &state.render_config,
        &state.extract_options,
        &state.deal_store,
    )
    .await
    .map_err(|e| match e {
        ScrapeError::Render(render_err) => {
            tracing::warn!(slug, error = %render_err, "render failed");
            ApiError::new(
                req_id.0.clone(),
                "bad_gateway",
                format!("failed to render store page: {render_err}"),
            )
        }
        ScrapeError::Persist(store_err) => {
            tracing::error!(slug, error = %store_err, "failed to persist scrape result");
            ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "failed to persist scrape result",
            )
        }
    })?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}
