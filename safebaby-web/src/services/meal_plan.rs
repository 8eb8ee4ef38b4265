//! Weekly meal plan generation
//!
//! Picks a random product from a pre-filtered top-score pool for every
//! day/slot pair. Randomized assignment, no constraint solving.

use rand::Rng;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::db::{meal_plans, products};
use safebaby_common::db::init::get_setting_i64;
use safebaby_common::db::models::MealPlan;
use safebaby_common::{Error, Result};

pub const DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub const SLOTS: [&str; 3] = ["breakfast", "lunch", "snack"];

/// Generate (or regenerate) a user's plan for one week
///
/// One plan per user per week; regeneration replaces the stored
/// assignments.
pub async fn generate_week(
    db: &SqlitePool,
    user_guid: &str,
    week_start: &str,
) -> Result<MealPlan> {
    let min_score = get_setting_i64(db, "meal_plan_min_score", 70).await?;
    let pool_size = get_setting_i64(db, "meal_plan_pool_size", 50).await?;

    let pool = products::top_scored(db, min_score, pool_size).await?;
    if pool.is_empty() {
        return Err(Error::NotFound(
            "No products with a high enough safety score to plan meals".to_string(),
        ));
    }

    let assignments: HashMap<String, String> = {
        let mut rng = rand::thread_rng();
        let mut assignments: HashMap<String, String> = HashMap::new();

        for day in DAYS {
            for slot in SLOTS {
                let pick = &pool[rng.gen_range(0..pool.len())];
                assignments.insert(format!("{}.{}", day, slot), pick.guid.clone());
            }
        }
        assignments
    };

    let assignments_json = serde_json::to_string(&assignments)
        .map_err(|e| Error::Internal(format!("Failed to serialize assignments: {}", e)))?;

    meal_plans::upsert(db, user_guid, week_start, &assignments_json).await
}
