//! Photo scan endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::{scan_product_photo, ScanOutcome};
use crate::AppState;

/// Scan request body
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Base64-encoded product photo
    pub photo_base64: String,
}

/// POST /api/scan
///
/// Wraps photo extraction and the lookup waterfall in one fixed timeout.
pub async fn scan_photo(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanOutcome>> {
    if request.photo_base64.trim().is_empty() {
        return Err(ApiError::BadRequest("Empty photo payload".to_string()));
    }

    let outcome = scan_product_photo(
        &state.db,
        state.product_source.as_ref(),
        state.analyzer.as_ref(),
        &request.photo_base64,
        state.scan_timeout,
    )
    .await;

    info!("Photo scan complete");

    Ok(Json(outcome))
}

/// Build scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/api/scan", post(scan_photo))
}
