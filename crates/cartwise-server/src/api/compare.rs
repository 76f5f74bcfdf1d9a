use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use cartwise_core::ComparisonResult;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CompareQuery {
    /// Comma-separated wanted item names.
    pub items: Option<String>,
}

pub(super) async fn compare_items(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ApiResponse<ComparisonResult>>, ApiError> {
    let wanted = parse_wanted_items(query.items.as_deref().unwrap_or_default());
    if wanted.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "missing items param",
        ));
    }

    let deals = state
        .deal_store
        .load_all()
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let result = cartwise_core::compare(&wanted, &deals);

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn parse_wanted_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
