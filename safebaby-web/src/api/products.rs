//! Product detail endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::db::products;
use safebaby_common::barcode::normalize_barcode;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use safebaby_common::types::ProductDetail;

/// GET /api/products/:barcode
///
/// Full product detail: lab results with contaminants, plus recalls.
pub async fn get_product(
    State(state): State<AppState>,
    Path(raw_barcode): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    let barcode = normalize_barcode(&raw_barcode).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid barcode: {:?}", raw_barcode))
    })?;

    let detail = products::find_detail_by_barcode(&state.db, &barcode)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No product with barcode {}", barcode)))?;

    Ok(Json(detail))
}

/// Build product routes
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/api/products/:barcode", get(get_product))
}
