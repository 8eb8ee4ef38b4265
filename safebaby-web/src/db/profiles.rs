//! User profile queries

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use safebaby_common::db::models::UserProfile;
use safebaby_common::Result;

/// Fetch a profile by guid
pub async fn get(pool: &SqlitePool, guid: &str) -> Result<Option<UserProfile>> {
    let row = sqlx::query(
        "SELECT guid, email, display_name, subscription_tier
         FROM user_profiles WHERE guid = ?",
    )
    .bind(guid)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| UserProfile {
        guid: r.get("guid"),
        email: r.get("email"),
        display_name: r.get("display_name"),
        subscription_tier: r.get("subscription_tier"),
    }))
}

/// Create a profile; returns the new guid
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    display_name: Option<&str>,
    subscription_tier: &str,
) -> Result<String> {
    let guid = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO user_profiles (guid, email, display_name, subscription_tier)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&guid)
    .bind(email)
    .bind(display_name)
    .bind(subscription_tier)
    .execute(pool)
    .await?;

    Ok(guid)
}
