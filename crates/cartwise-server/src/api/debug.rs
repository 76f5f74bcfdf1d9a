//! Raw debug-artifact views: the last rendered HTML and screenshot per store.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};

use crate::middleware::RequestId;

use super::{find_store, ApiError, AppState};

pub(super) async fn debug_html(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let store = find_store(&state.stores, &slug).ok_or_else(|| {
        ApiError::new(req_id.0.clone(), "not_found", format!("unknown store '{slug}'"))
    })?;

    let path = state.deal_store.debug_html_path(&store.slug());
    let html = read_artifact(&path, &req_id, "no debug HTML captured yet; scrape first")?;

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response())
}

pub(super) async fn debug_screenshot(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let store = find_store(&state.stores, &slug).ok_or_else(|| {
        ApiError::new(req_id.0.clone(), "not_found", format!("unknown store '{slug}'"))
    })?;

    let path = state.deal_store.screenshot_path(&store.slug());
    let bytes = read_artifact(&path, &req_id, "no screenshot captured yet; scrape first")?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

fn read_artifact(
    path: &std::path::Path,
    req_id: &RequestId,
    missing_message: &str,
) -> Result<Vec<u8>, ApiError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::new(
            req_id.0.clone(),
            "not_found",
            missing_message,
        )),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read debug artifact");
            Err(ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "failed to read debug artifact",
            ))
        }
    }
}
