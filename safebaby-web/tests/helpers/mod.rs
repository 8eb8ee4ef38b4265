//! Shared test helpers: in-memory database, stub collaborators, seeders

#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use safebaby_common::db::init::{create_tables, init_default_settings};
use safebaby_common::types::ProductAnalysis;
use safebaby_web::clients::{ProductApiError, VisionError};
use safebaby_web::services::{
    AnalysisProvider, ExternalProduct, PhotoExtraction, ProductSource,
};
use safebaby_web::{build_router, AppState};

/// Fresh in-memory database with the full schema and default settings
pub async fn setup_test_db() -> SqlitePool {
    // Single connection so every query sees the same :memory: database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");

    create_tables(&pool).await.expect("Should create tables");
    init_default_settings(&pool)
        .await
        .expect("Should seed default settings");

    pool
}

/// Product metadata stub with a call counter
pub struct StubProductSource {
    pub products: HashMap<String, ExternalProduct>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubProductSource {
    pub fn empty() -> Self {
        Self {
            products: HashMap::new(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_product(product: ExternalProduct) -> Self {
        let mut products = HashMap::new();
        products.insert(product.barcode.clone(), product);
        Self {
            products,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ProductSource for StubProductSource {
    async fn fetch_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<ExternalProduct>, ProductApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ProductApiError::NetworkError("stub failure".to_string()));
        }

        Ok(self.products.get(barcode).cloned())
    }
}

/// Vision/analysis stub with call counters and an optional artificial delay
pub struct StubAnalyzer {
    /// Extraction result; None simulates an extraction failure
    pub extraction: Option<PhotoExtraction>,
    pub fail_analysis: bool,
    pub extract_delay: Option<Duration>,
    pub extract_calls: AtomicUsize,
    pub analyze_calls: AtomicUsize,
}

impl StubAnalyzer {
    pub fn succeeding() -> Self {
        Self {
            extraction: Some(PhotoExtraction::default()),
            fail_analysis: false,
            extract_delay: None,
            extract_calls: AtomicUsize::new(0),
            analyze_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_analysis() -> Self {
        Self {
            fail_analysis: true,
            ..Self::succeeding()
        }
    }

    pub fn with_extraction(extraction: PhotoExtraction) -> Self {
        Self {
            extraction: Some(extraction),
            ..Self::succeeding()
        }
    }

    pub fn failing_extraction() -> Self {
        Self {
            extraction: None,
            ..Self::succeeding()
        }
    }

    pub fn analyze_count(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AnalysisProvider for StubAnalyzer {
    async fn extract_from_photo(
        &self,
        _photo_base64: &str,
    ) -> Result<PhotoExtraction, VisionError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.extract_delay {
            tokio::time::sleep(delay).await;
        }

        match &self.extraction {
            Some(extraction) => Ok(extraction.clone()),
            None => Err(VisionError::ApiError(500, "stub extraction failure".to_string())),
        }
    }

    async fn analyze_product(
        &self,
        product: &ExternalProduct,
    ) -> Result<ProductAnalysis, VisionError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_analysis {
            return Err(VisionError::ApiError(500, "stub analysis failure".to_string()));
        }

        Ok(ProductAnalysis {
            product_name: product.name.clone(),
            brand: product.brand.clone(),
            ingredients: product.ingredients.clone(),
            safety_score: 80,
            summary: "Low estimated heavy-metal exposure.".to_string(),
            concerns: vec![],
        })
    }
}

/// App state wired to the given stubs
pub fn test_state(
    pool: SqlitePool,
    source: Arc<StubProductSource>,
    analyzer: Arc<StubAnalyzer>,
) -> AppState {
    AppState::new(pool, source, analyzer, Duration::from_secs(5))
}

/// Router wired to the given stubs
pub fn test_app(
    pool: SqlitePool,
    source: Arc<StubProductSource>,
    analyzer: Arc<StubAnalyzer>,
) -> axum::Router {
    build_router(test_state(pool, source, analyzer))
}

pub fn sample_external_product(barcode: &str) -> ExternalProduct {
    ExternalProduct {
        barcode: barcode.to_string(),
        name: "Organic Oat Cereal".to_string(),
        brand: Some("Acme Baby".to_string()),
        category: Some("Cereal".to_string()),
        ingredients: Some("whole grain oats, iron".to_string()),
    }
}

/// Seed a lab-tested product with one lab result and one contaminant.
/// Returns the product guid.
pub async fn seed_lab_tested_product(pool: &SqlitePool, barcode: &str, name: &str) -> String {
    let product_guid = seed_product(pool, barcode, name, 85).await;
    let lab_result_guid = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO lab_results (guid, product_guid, lab_name, test_date, report_url, verified)
         VALUES (?, ?, 'Eurofins', '2026-01-15', NULL, 1)",
    )
    .bind(&lab_result_guid)
    .bind(&product_guid)
    .execute(pool)
    .await
    .expect("Should insert lab result");

    sqlx::query(
        "INSERT INTO contaminants
             (guid, lab_result_guid, name, amount_ppb, unit, limit_ppb, exceeds_limit, health_impact)
         VALUES (?, ?, 'Lead', 2.0, 'ppb', 10.0, 0, NULL)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&lab_result_guid)
    .execute(pool)
    .await
    .expect("Should insert contaminant");

    product_guid
}

/// Seed a bare product row. Returns the product guid.
pub async fn seed_product(pool: &SqlitePool, barcode: &str, name: &str, score: i64) -> String {
    let guid = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO products (guid, name, brand, category, barcode, overall_score)
         VALUES (?, ?, 'Acme Baby', 'Cereal', ?, ?)",
    )
    .bind(&guid)
    .bind(name)
    .bind(barcode)
    .bind(score)
    .execute(pool)
    .await
    .expect("Should insert product");

    guid
}

/// Seed a cached AI analysis for a barcode
pub async fn seed_cached_analysis(pool: &SqlitePool, barcode: &str) {
    let analysis = ProductAnalysis {
        product_name: "Cached Cereal".to_string(),
        brand: Some("Acme Baby".to_string()),
        ingredients: Some("oats".to_string()),
        safety_score: 75,
        summary: "Cached analysis.".to_string(),
        concerns: vec![],
    };

    safebaby_web::db::analysis_cache::upsert(pool, barcode, &analysis)
        .await
        .expect("Should seed cache row");
}

/// Seed a user profile. Returns the user guid.
pub async fn seed_user(pool: &SqlitePool, email: &str, tier: &str) -> String {
    safebaby_web::db::profiles::create(pool, email, Some("Test Parent"), tier)
        .await
        .expect("Should create profile")
}
