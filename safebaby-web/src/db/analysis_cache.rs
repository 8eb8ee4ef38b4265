//! AI-analysis cache operations
//!
//! At most one cached analysis per barcode. Writes go through a
//! database-level upsert so concurrent first lookups for the same barcode
//! both succeed and leave exactly one row.

use sqlx::{Row, SqlitePool};

use safebaby_common::types::ProductAnalysis;
use safebaby_common::{Error, Result};

/// Fetch a cached analysis by barcode
pub async fn get_by_barcode(pool: &SqlitePool, barcode: &str) -> Result<Option<ProductAnalysis>> {
    let row = sqlx::query(
        "SELECT product_name, brand, ingredients, safety_score, summary, concerns
         FROM analyzed_products WHERE barcode = ?",
    )
    .bind(barcode)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let concerns: String = row.get("concerns");
            let concerns: Vec<String> = serde_json::from_str(&concerns)
                .map_err(|e| Error::Internal(format!("Failed to deserialize concerns: {}", e)))?;

            Ok(Some(ProductAnalysis {
                product_name: row.get("product_name"),
                brand: row.get("brand"),
                ingredients: row.get("ingredients"),
                safety_score: row.get("safety_score"),
                summary: row.get("summary"),
                concerns,
            }))
        }
        None => Ok(None),
    }
}

/// Insert or refresh the cached analysis for a barcode
pub async fn upsert(pool: &SqlitePool, barcode: &str, analysis: &ProductAnalysis) -> Result<()> {
    let concerns = serde_json::to_string(&analysis.concerns)
        .map_err(|e| Error::Internal(format!("Failed to serialize concerns: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO analyzed_products (
            barcode, product_name, brand, ingredients, safety_score, summary, concerns
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(barcode) DO UPDATE SET
            product_name = excluded.product_name,
            brand = excluded.brand,
            ingredients = excluded.ingredients,
            safety_score = excluded.safety_score,
            summary = excluded.summary,
            concerns = excluded.concerns,
            analyzed_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(barcode)
    .bind(&analysis.product_name)
    .bind(&analysis.brand)
    .bind(&analysis.ingredients)
    .bind(analysis.safety_score)
    .bind(&analysis.summary)
    .bind(&concerns)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count cached rows for a barcode (used by tests to verify the invariant)
pub async fn count_for_barcode(pool: &SqlitePool, barcode: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyzed_products WHERE barcode = ?")
        .bind(barcode)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
