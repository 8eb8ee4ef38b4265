//! Product queries

use sqlx::{Row, SqlitePool};

use safebaby_common::db::models::{Contaminant, LabResult, Product, Recall};
use safebaby_common::types::{LabResultDetail, ProductDetail};
use safebaby_common::Result;

fn product_from_row(row: &sqlx::sqlite::SqliteRow) -> Product {
    Product {
        guid: row.get("guid"),
        name: row.get("name"),
        brand: row.get("brand"),
        category: row.get("category"),
        barcode: row.get("barcode"),
        description: row.get("description"),
        overall_score: row.get("overall_score"),
    }
}

/// Fetch a product row by exact barcode match
pub async fn find_by_barcode(pool: &SqlitePool, barcode: &str) -> Result<Option<Product>> {
    let row = sqlx::query(
        "SELECT guid, name, brand, category, barcode, description, overall_score
         FROM products WHERE barcode = ?",
    )
    .bind(barcode)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| product_from_row(&r)))
}

/// Fetch a product with its lab results, contaminants and recalls
pub async fn find_detail_by_barcode(
    pool: &SqlitePool,
    barcode: &str,
) -> Result<Option<ProductDetail>> {
    let Some(product) = find_by_barcode(pool, barcode).await? else {
        return Ok(None);
    };

    let lab_rows = sqlx::query(
        "SELECT guid, product_guid, lab_name, test_date, report_url, verified
         FROM lab_results WHERE product_guid = ? ORDER BY test_date DESC",
    )
    .bind(&product.guid)
    .fetch_all(pool)
    .await?;

    let mut lab_results = Vec::with_capacity(lab_rows.len());
    for row in lab_rows {
        let lab_result = LabResult {
            guid: row.get("guid"),
            product_guid: row.get("product_guid"),
            lab_name: row.get("lab_name"),
            test_date: row.get("test_date"),
            report_url: row.get("report_url"),
            verified: row.get::<i64, _>("verified") != 0,
        };

        let contaminant_rows = sqlx::query(
            "SELECT guid, lab_result_guid, name, amount_ppb, unit, limit_ppb,
                    exceeds_limit, health_impact
             FROM contaminants WHERE lab_result_guid = ? ORDER BY name ASC",
        )
        .bind(&lab_result.guid)
        .fetch_all(pool)
        .await?;

        let contaminants = contaminant_rows
            .iter()
            .map(|c| Contaminant {
                guid: c.get("guid"),
                lab_result_guid: c.get("lab_result_guid"),
                name: c.get("name"),
                amount_ppb: c.get("amount_ppb"),
                unit: c.get("unit"),
                limit_ppb: c.get("limit_ppb"),
                exceeds_limit: c.get::<i64, _>("exceeds_limit") != 0,
                health_impact: c.get("health_impact"),
            })
            .collect();

        lab_results.push(LabResultDetail {
            lab_result,
            contaminants,
        });
    }

    let recalls = recalls_for_product(pool, &product.guid).await?;

    Ok(Some(ProductDetail {
        product,
        lab_results,
        recalls,
    }))
}

async fn recalls_for_product(pool: &SqlitePool, product_guid: &str) -> Result<Vec<Recall>> {
    let rows = sqlx::query(
        "SELECT guid, product_guid, reason, risk_class, recall_date, fda_url, active
         FROM recalls WHERE product_guid = ? ORDER BY recall_date DESC",
    )
    .bind(product_guid)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| Recall {
            guid: r.get("guid"),
            product_guid: r.get("product_guid"),
            reason: r.get("reason"),
            risk_class: r.get("risk_class"),
            recall_date: r.get("recall_date"),
            fda_url: r.get("fda_url"),
            active: r.get::<i64, _>("active") != 0,
        })
        .collect())
}

/// Count products matching a free-text query over name, brand and category
pub async fn count_search(pool: &SqlitePool, query: &str) -> Result<i64> {
    let pattern = format!("%{}%", query);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM products
         WHERE name LIKE ? OR brand LIKE ? OR category LIKE ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Search products, best scores first
pub async fn search(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>> {
    let pattern = format!("%{}%", query);

    let rows = sqlx::query(
        "SELECT guid, name, brand, category, barcode, description, overall_score
         FROM products
         WHERE name LIKE ? OR brand LIKE ? OR category LIKE ?
         ORDER BY overall_score DESC, name ASC
         LIMIT ? OFFSET ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(product_from_row).collect())
}

/// Products at or above a minimum score, best first (meal-plan pool)
pub async fn top_scored(pool: &SqlitePool, min_score: i64, limit: i64) -> Result<Vec<Product>> {
    let rows = sqlx::query(
        "SELECT guid, name, brand, category, barcode, description, overall_score
         FROM products
         WHERE overall_score >= ?
         ORDER BY overall_score DESC
         LIMIT ?",
    )
    .bind(min_score)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(product_from_row).collect())
}

/// Fetch a product by guid
pub async fn find_by_guid(pool: &SqlitePool, guid: &str) -> Result<Option<Product>> {
    let row = sqlx::query(
        "SELECT guid, name, brand, category, barcode, description, overall_score
         FROM products WHERE guid = ?",
    )
    .bind(guid)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| product_from_row(&r)))
}
