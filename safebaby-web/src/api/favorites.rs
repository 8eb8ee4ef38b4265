//! User favorites endpoints
//!
//! Free-tier accounts are limited to a settings-backed maximum favorite
//! count; adding past the limit returns an upgrade-required error.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{favorites, products, profiles};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use safebaby_common::db::init::get_setting_i64;
use safebaby_common::db::models::Product;

/// Favorite request body
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub product_guid: String,
}

/// Favorite list response
#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub user_guid: String,
    pub count: i64,
    pub products: Vec<Product>,
}

/// GET /api/users/:user_guid/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_guid): Path<String>,
) -> ApiResult<Json<FavoritesResponse>> {
    require_profile(&state, &user_guid).await?;

    let items = favorites::list_for_user(&state.db, &user_guid).await?;

    Ok(Json(FavoritesResponse {
        user_guid,
        count: items.len() as i64,
        products: items,
    }))
}

/// POST /api/users/:user_guid/favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(user_guid): Path<String>,
    Json(request): Json<AddFavoriteRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let profile = require_profile(&state, &user_guid).await?;

    if products::find_by_guid(&state.db, &request.product_guid)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "No product with guid {}",
            request.product_guid
        )));
    }

    // Free tier is capped; premium is unlimited
    if profile.subscription_tier == "free" {
        let limit = get_setting_i64(&state.db, "free_favorite_limit", 10).await?;
        let count = favorites::count_for_user(&state.db, &user_guid).await?;
        if count >= limit {
            return Err(ApiError::UpgradeRequired(format!(
                "Free accounts can save up to {} favorites. Upgrade to save more.",
                limit
            )));
        }
    }

    let added = favorites::add(&state.db, &user_guid, &request.product_guid).await?;
    if !added {
        return Err(ApiError::Conflict("Product is already a favorite".to_string()));
    }

    Ok(Json(serde_json::json!({ "added": true })))
}

/// DELETE /api/users/:user_guid/favorites/:product_guid
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_guid, product_guid)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    require_profile(&state, &user_guid).await?;

    let removed = favorites::remove(&state.db, &user_guid, &product_guid).await?;
    if !removed {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "removed": true })))
}

async fn require_profile(
    state: &AppState,
    user_guid: &str,
) -> ApiResult<safebaby_common::db::models::UserProfile> {
    profiles::get(&state.db, user_guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user with guid {}", user_guid)))
}

/// Build favorite routes
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/:user_guid/favorites", get(list_favorites))
        .route("/api/users/:user_guid/favorites", post(add_favorite))
        .route(
            "/api/users/:user_guid/favorites/:product_guid",
            delete(remove_favorite),
        )
}
