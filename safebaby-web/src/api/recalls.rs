//! Recall listing endpoint

use axum::{extract::State, routing::get, Json, Router};

use crate::db::recalls::{self, RecallListing};
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/recalls
///
/// Active recalls joined with product name/barcode, newest first.
pub async fn list_recalls(State(state): State<AppState>) -> ApiResult<Json<Vec<RecallListing>>> {
    let listings = recalls::active_recalls(&state.db).await?;
    Ok(Json(listings))
}

/// Build recall routes
pub fn recall_routes() -> Router<AppState> {
    Router::new().route("/api/recalls", get(list_recalls))
}
