//! Transactional disclosure import
//!
//! Each product row writes product + lab result + contaminants inside one
//! transaction; a failure anywhere rolls the whole product back, so the
//! database never holds orphaned lab rows. Re-running an import skips
//! barcodes that already exist.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::disclosure::{DisclosureRecord, RecallRecord};
use safebaby_common::barcode::normalize_barcode;
use safebaby_common::scoring::{
    exceeds_limit, health_impact, safety_score, SafetyLimits,
};

/// Counts reported after an import run
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Import disclosure rows, one transaction per product
pub async fn import_products(
    pool: &SqlitePool,
    records: &[DisclosureRecord],
) -> Result<ImportSummary> {
    let limits = SafetyLimits::default();
    let mut summary = ImportSummary::default();

    for record in records {
        let Some(barcode) = normalize_barcode(&record.barcode) else {
            warn!(barcode = %record.barcode, name = %record.name, "Skipping row with invalid barcode");
            summary.skipped += 1;
            continue;
        };

        // Idempotent re-run: existing barcodes are left untouched
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE barcode = ?")
            .bind(&barcode)
            .fetch_one(pool)
            .await?;
        if exists > 0 {
            info!(barcode = %barcode, "Product already imported, skipping");
            summary.skipped += 1;
            continue;
        }

        let levels = record.levels();
        let score = safety_score(levels, limits);

        let product_guid = Uuid::new_v4().to_string();
        let lab_result_guid = Uuid::new_v4().to_string();

        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO products (guid, name, brand, category, barcode, description, overall_score)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product_guid)
        .bind(&record.name)
        .bind(&record.brand)
        .bind(&record.category)
        .bind(&barcode)
        .bind(&record.description)
        .bind(score)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO lab_results (guid, product_guid, lab_name, test_date, report_url, verified)
             VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(&lab_result_guid)
        .bind(&product_guid)
        .bind(&record.lab_name)
        .bind(&record.test_date)
        .bind(&record.report_url)
        .execute(&mut *tx)
        .await?;

        let readings = [
            ("Lead", levels.lead, limits.lead),
            ("Arsenic", levels.arsenic, limits.arsenic),
            ("Cadmium", levels.cadmium, limits.cadmium),
            ("Mercury", levels.mercury, limits.mercury),
        ];

        for (name, amount_ppb, limit_ppb) in readings {
            sqlx::query(
                "INSERT INTO contaminants
                     (guid, lab_result_guid, name, amount_ppb, unit, limit_ppb, exceeds_limit, health_impact)
                 VALUES (?, ?, ?, ?, 'ppb', ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&lab_result_guid)
            .bind(name)
            .bind(amount_ppb)
            .bind(limit_ppb)
            .bind(exceeds_limit(amount_ppb, limit_ppb) as i64)
            .bind(health_impact(name))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(barcode = %barcode, name = %record.name, score = score, "Imported product");
        summary.imported += 1;
    }

    Ok(summary)
}

/// Import recall rows, matching products by barcode
pub async fn import_recalls(
    pool: &SqlitePool,
    records: &[RecallRecord],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for record in records {
        let Some(barcode) = normalize_barcode(&record.barcode) else {
            warn!(barcode = %record.barcode, "Skipping recall with invalid barcode");
            summary.skipped += 1;
            continue;
        };

        let product_guid: Option<String> =
            sqlx::query_scalar("SELECT guid FROM products WHERE barcode = ?")
                .bind(&barcode)
                .fetch_optional(pool)
                .await?;

        let Some(product_guid) = product_guid else {
            warn!(barcode = %barcode, "No product for recall barcode, skipping");
            summary.skipped += 1;
            continue;
        };

        sqlx::query(
            "INSERT INTO recalls (guid, product_guid, reason, risk_class, recall_date, fda_url, active)
             VALUES (?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&product_guid)
        .bind(&record.reason)
        .bind(&record.risk_class)
        .bind(&record.recall_date)
        .bind(&record.fda_url)
        .execute(pool)
        .await?;

        info!(barcode = %barcode, risk_class = %record.risk_class, "Imported recall");
        summary.imported += 1;
    }

    Ok(summary)
}
