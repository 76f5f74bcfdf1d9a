use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwise_core::Deal;

use crate::middleware::RequestId;

use super::{find_store, map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DealsQuery {
    pub store: Option<String>,
}

/// A persisted deal plus its derived unit price, recomputed on every call and
/// never stored.
#[derive(Debug, Serialize)]
pub(super) struct DealView {
    #[serde(flatten)]
    deal: Deal,
    unit_price: Option<Decimal>,
}

impl From<Deal> for DealView {
    fn from(deal: Deal) -> Self {
        let unit_price = deal.unit_price().map(|p| p.round_dp(4));
        Self { deal, unit_price }
    }
}

pub(super) async fn list_deals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DealsQuery>,
) -> Result<Json<ApiResponse<Vec<DealView>>>, ApiError> {
    let deals = match query.store.as_deref() {
        Some(slug) => {
            let store = find_store(&state.stores, slug).ok_or_else(|| {
                ApiError::new(req_id.0.clone(), "not_found", format!("unknown store '{slug}'"))
            })?;
            state
                .deal_store
                .load_deals(&store.slug())
                .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        }
        None => state
            .deal_store
            .load_all()
            .map_err(|e| map_store_error(req_id.0.clone(), &e))?,
    };

    let data: Vec<DealView> = deals.into_iter().map(DealView::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
