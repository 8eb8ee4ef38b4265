//! Barcode lookup endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::services::lookup_product;
use crate::AppState;
use safebaby_common::types::LookupResult;

/// GET /api/lookup/:barcode
///
/// Runs the lookup waterfall. Always returns 200 with a result envelope;
/// invalid input yields the `error` variant rather than an HTTP error, so
/// the page-rendering layer has one shape to consume.
pub async fn lookup_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Json<LookupResult> {
    let result = lookup_product(
        &state.db,
        state.product_source.as_ref(),
        state.analyzer.as_ref(),
        &barcode,
    )
    .await;

    info!(barcode = %barcode, result = result.kind(), "Lookup complete");

    Json(result)
}

/// Build lookup routes
pub fn lookup_routes() -> Router<AppState> {
    Router::new().route("/api/lookup/:barcode", get(lookup_barcode))
}
