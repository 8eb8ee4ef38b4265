//! safebaby-web library - HTTP service for barcode lookup, photo scan,
//! search, favorites and meal plans
//!
//! Exposes the router and state so integration tests can drive the service
//! in-process.

pub mod api;
pub mod clients;
pub mod db;
pub mod error;
pub mod pagination;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::services::{AnalysisProvider, ProductSource};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// External product metadata collaborator
    pub product_source: Arc<dyn ProductSource>,
    /// AI vision/analysis collaborator
    pub analyzer: Arc<dyn AnalysisProvider>,
    /// Photo scan timeout
    pub scan_timeout: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        product_source: Arc<dyn ProductSource>,
        analyzer: Arc<dyn AnalysisProvider>,
        scan_timeout: Duration,
    ) -> Self {
        Self {
            db,
            product_source,
            analyzer,
            scan_timeout,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::lookup_routes())
        .merge(api::scan_routes())
        .merge(api::search_routes())
        .merge(api::product_routes())
        .merge(api::recall_routes())
        .merge(api::favorite_routes())
        .merge(api::meal_plan_routes())
        .merge(api::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
