mod compare;
mod deals;
mod debug;
mod scrape;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cartwise_core::StoreConfig;
use cartwise_scraper::{ExtractOptions, RenderConfig, Renderer};
use cartwise_store::DealStore;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub deal_store: DealStore,
    pub stores: Arc<Vec<StoreConfig>>,
    pub renderer: Arc<dyn Renderer>,
    pub render_config: Arc<RenderConfig>,
    pub extract_options: Arc<ExtractOptions>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(self)).into_response()
    }
}

/// Resolve a store slug from the catalog. Doing the lookup against the
/// catalog (rather than trusting the path segment) also keeps arbitrary
/// slugs out of artifact file names.
pub(super) fn find_store<'a>(
    stores: &'a [StoreConfig],
    slug: &str,
) -> Option<&'a StoreConfig> {
    stores.iter().find(|s| s.slug() == slug)
}

pub(super) fn map_store_error(request_id: String, error: &cartwise_store::StoreError) -> ApiError {
    tracing::error!(error = %error, "deal store operation failed");
    ApiError::new(request_id, "internal_error", "deal store operation failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/deals", get(deals::list_deals))
        .route("/api/v1/compare", get(compare::compare_items))
        .route("/api/v1/scrape/{slug}", post(scrape::trigger_scrape))
        .route("/api/v1/debug/{slug}/html", get(debug::debug_html))
        .route(
            "/api/v1/debug/{slug}/screenshot",
            get(debug::debug_screenshot),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(_state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}
