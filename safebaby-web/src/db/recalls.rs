//! Recall queries

use serde::Serialize;
use sqlx::{Row, SqlitePool};

use safebaby_common::db::models::Recall;
use safebaby_common::Result;

/// Recall joined with its product's name and barcode for listing
#[derive(Debug, Clone, Serialize)]
pub struct RecallListing {
    #[serde(flatten)]
    pub recall: Recall,
    pub product_name: String,
    pub product_barcode: String,
}

/// Active recalls, newest first
pub async fn active_recalls(pool: &SqlitePool) -> Result<Vec<RecallListing>> {
    let rows = sqlx::query(
        "SELECT r.guid, r.product_guid, r.reason, r.risk_class, r.recall_date,
                r.fda_url, r.active, p.name AS product_name, p.barcode AS product_barcode
         FROM recalls r
         JOIN products p ON r.product_guid = p.guid
         WHERE r.active = 1
         ORDER BY r.recall_date DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| RecallListing {
            recall: Recall {
                guid: r.get("guid"),
                product_guid: r.get("product_guid"),
                reason: r.get("reason"),
                risk_class: r.get("risk_class"),
                recall_date: r.get("recall_date"),
                fda_url: r.get("fda_url"),
                active: r.get::<i64, _>("active") != 0,
            },
            product_name: r.get("product_name"),
            product_barcode: r.get("product_barcode"),
        })
        .collect())
}
