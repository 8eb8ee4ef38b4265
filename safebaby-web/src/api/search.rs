//! Product search endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::products;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;
use safebaby_common::db::models::Product;

/// Query parameters for product search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text query over name, brand and category
    pub q: String,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Search response with results and metadata
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub products: Vec<Product>,
}

/// GET /api/search?q=oat&page=1
///
/// LIKE search over product name, brand and category, best scores first.
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::BadRequest("Empty search query".to_string()));
    }

    let total_results = products::count_search(&state.db, q).await?;
    let p = calculate_pagination(total_results, query.page);

    let results = products::search(&state.db, q, PAGE_SIZE, p.offset).await?;

    Ok(Json(SearchResponse {
        query: q.to_string(),
        total_results,
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        products: results,
    }))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/api/search", get(search_products))
}
