//! User favorite queries

use sqlx::{Row, SqlitePool};

use safebaby_common::db::models::Product;
use safebaby_common::Result;

/// Count a user's favorites
pub async fn count_for_user(pool: &SqlitePool, user_guid: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_favorites WHERE user_guid = ?")
        .bind(user_guid)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List a user's favorited products, most recently added first
pub async fn list_for_user(pool: &SqlitePool, user_guid: &str) -> Result<Vec<Product>> {
    let rows = sqlx::query(
        "SELECT p.guid, p.name, p.brand, p.category, p.barcode, p.description, p.overall_score
         FROM user_favorites f
         JOIN products p ON f.product_guid = p.guid
         WHERE f.user_guid = ?
         ORDER BY f.created_at DESC",
    )
    .bind(user_guid)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| Product {
            guid: r.get("guid"),
            name: r.get("name"),
            brand: r.get("brand"),
            category: r.get("category"),
            barcode: r.get("barcode"),
            description: r.get("description"),
            overall_score: r.get("overall_score"),
        })
        .collect())
}

/// Add a favorite; returns false when it already existed
pub async fn add(pool: &SqlitePool, user_guid: &str, product_guid: &str) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO user_favorites (user_guid, product_guid) VALUES (?, ?)
         ON CONFLICT(user_guid, product_guid) DO NOTHING",
    )
    .bind(user_guid)
    .bind(product_guid)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a favorite; returns false when it did not exist
pub async fn remove(pool: &SqlitePool, user_guid: &str, product_guid: &str) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM user_favorites WHERE user_guid = ? AND product_guid = ?")
            .bind(user_guid)
            .bind(product_guid)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
