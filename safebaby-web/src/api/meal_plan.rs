//! Meal plan endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::db::{meal_plans, profiles};
use crate::error::{ApiError, ApiResult};
use crate::services::meal_plan;
use crate::AppState;
use safebaby_common::db::models::MealPlan;
use safebaby_common::Error;

/// Plan generation request body
#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    /// Monday of the planned week, YYYY-MM-DD
    pub week_start: String,
}

/// POST /api/users/:user_guid/meal-plan
///
/// Generate (or regenerate) the week's plan from the top-score pool.
pub async fn generate_plan(
    State(state): State<AppState>,
    Path(user_guid): Path<String>,
    Json(request): Json<GeneratePlanRequest>,
) -> ApiResult<Json<MealPlan>> {
    require_profile(&state, &user_guid).await?;

    if chrono::NaiveDate::parse_from_str(&request.week_start, "%Y-%m-%d").is_err() {
        return Err(ApiError::BadRequest(format!(
            "Invalid week_start (expected YYYY-MM-DD): {}",
            request.week_start
        )));
    }

    let plan = meal_plan::generate_week(&state.db, &user_guid, &request.week_start)
        .await
        .map_err(|e| match e {
            Error::NotFound(msg) => ApiError::Conflict(msg),
            other => ApiError::Common(other),
        })?;

    Ok(Json(plan))
}

/// GET /api/users/:user_guid/meal-plan/:week_start
pub async fn get_plan(
    State(state): State<AppState>,
    Path((user_guid, week_start)): Path<(String, String)>,
) -> ApiResult<Json<MealPlan>> {
    require_profile(&state, &user_guid).await?;

    let plan = meal_plans::get(&state.db, &user_guid, &week_start)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("No meal plan for week {}", week_start))
        })?;

    Ok(Json(plan))
}

async fn require_profile(state: &AppState, user_guid: &str) -> ApiResult<()> {
    profiles::get(&state.db, user_guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user with guid {}", user_guid)))?;
    Ok(())
}

/// Build meal plan routes
pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/:user_guid/meal-plan", post(generate_plan))
        .route("/api/users/:user_guid/meal-plan/:week_start", get(get_plan))
}
