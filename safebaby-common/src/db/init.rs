//! Database initialization
//!
//! Creates the database on first run and brings the schema up idempotently.
//! Every table uses `CREATE TABLE IF NOT EXISTS`, so startup is safe to
//! repeat against an existing database.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Wait briefly on lock contention instead of failing immediately
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_tables(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all SafeBaby tables (idempotent)
///
/// Public so integration tests can bring up the schema on an in-memory pool.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_products_table(pool).await?;
    create_lab_results_table(pool).await?;
    create_contaminants_table(pool).await?;
    create_analyzed_products_table(pool).await?;
    create_recalls_table(pool).await?;
    create_user_profiles_table(pool).await?;
    create_user_favorites_table(pool).await?;
    create_meal_plans_table(pool).await?;
    create_settings_table(pool).await?;

    Ok(())
}

async fn create_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            brand TEXT,
            category TEXT,
            barcode TEXT NOT NULL UNIQUE,
            description TEXT,
            overall_score INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_lab_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lab_results (
            guid TEXT PRIMARY KEY,
            product_guid TEXT NOT NULL REFERENCES products(guid),
            lab_name TEXT NOT NULL,
            test_date TEXT NOT NULL,
            report_url TEXT,
            verified INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_contaminants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contaminants (
            guid TEXT PRIMARY KEY,
            lab_result_guid TEXT NOT NULL REFERENCES lab_results(guid),
            name TEXT NOT NULL,
            amount_ppb REAL NOT NULL,
            unit TEXT NOT NULL DEFAULT 'ppb',
            limit_ppb REAL NOT NULL,
            exceeds_limit INTEGER NOT NULL DEFAULT 0,
            health_impact TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// AI-analysis cache: at most one row per barcode.
///
/// The UNIQUE barcode constraint plus upsert writes (ON CONFLICT) keep the
/// invariant under concurrent first lookups.
async fn create_analyzed_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analyzed_products (
            barcode TEXT PRIMARY KEY,
            product_name TEXT NOT NULL,
            brand TEXT,
            ingredients TEXT,
            safety_score INTEGER NOT NULL,
            summary TEXT NOT NULL,
            concerns TEXT NOT NULL DEFAULT '[]',
            analyzed_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_recalls_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recalls (
            guid TEXT PRIMARY KEY,
            product_guid TEXT NOT NULL REFERENCES products(guid),
            reason TEXT NOT NULL,
            risk_class TEXT NOT NULL,
            recall_date TEXT NOT NULL,
            fda_url TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            guid TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            display_name TEXT,
            subscription_tier TEXT NOT NULL DEFAULT 'free',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_favorites_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_favorites (
            user_guid TEXT NOT NULL REFERENCES user_profiles(guid),
            product_guid TEXT NOT NULL REFERENCES products(guid),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user_guid, product_guid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_meal_plans_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meal_plans (
            guid TEXT PRIMARY KEY,
            user_guid TEXT NOT NULL REFERENCES user_profiles(guid),
            week_start TEXT NOT NULL,
            assignments TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user_guid, week_start)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// Ensures all required settings exist with default values. NULL values are
/// reset to defaults.
pub async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // Favorites paywall
    ensure_setting(pool, "free_favorite_limit", "10").await?;

    // Photo scan
    ensure_setting(pool, "scan_timeout_ms", "30000").await?;

    // Product search
    ensure_setting(pool, "search_page_size", "20").await?;

    // Meal planner pool
    ensure_setting(pool, "meal_plan_min_score", "70").await?;
    ensure_setting(pool, "meal_plan_pool_size", "50").await?;

    info!("Default settings initialized");

    Ok(())
}

/// Insert a setting if missing, and reset it to the default if NULL
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(default_value)
        .execute(pool)
        .await?;

    sqlx::query("UPDATE settings SET value = ? WHERE key = ? AND value IS NULL")
        .bind(default_value)
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

/// Read an integer setting, falling back to the given default
pub async fn get_setting_i64(pool: &SqlitePool, key: &str, default: i64) -> Result<i64> {
    let value: Option<i64> =
        sqlx::query_scalar("SELECT CAST(value AS INTEGER) FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(value.unwrap_or(default))
}
