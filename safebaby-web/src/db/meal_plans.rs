//! Meal plan persistence

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use safebaby_common::db::models::MealPlan;
use safebaby_common::Result;

/// Insert or replace a user's plan for one week
pub async fn upsert(
    pool: &SqlitePool,
    user_guid: &str,
    week_start: &str,
    assignments_json: &str,
) -> Result<MealPlan> {
    let guid = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO meal_plans (guid, user_guid, week_start, assignments)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_guid, week_start) DO UPDATE SET
            assignments = excluded.assignments
        "#,
    )
    .bind(&guid)
    .bind(user_guid)
    .bind(week_start)
    .bind(assignments_json)
    .execute(pool)
    .await?;

    // Re-read so regeneration returns the row's stable guid
    get(pool, user_guid, week_start).await?.ok_or_else(|| {
        safebaby_common::Error::Internal("Meal plan row missing after upsert".to_string())
    })
}

/// Fetch a user's plan for one week
pub async fn get(
    pool: &SqlitePool,
    user_guid: &str,
    week_start: &str,
) -> Result<Option<MealPlan>> {
    let row = sqlx::query(
        "SELECT guid, user_guid, week_start, assignments
         FROM meal_plans WHERE user_guid = ? AND week_start = ?",
    )
    .bind(user_guid)
    .bind(week_start)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| MealPlan {
        guid: r.get("guid"),
        user_guid: r.get("user_guid"),
        week_start: r.get("week_start"),
        assignments: r.get("assignments"),
    }))
}
