//! safebaby-web - Product safety HTTP service
//!
//! Serves barcode lookup, photo scan, product search, recalls, favorites
//! and meal plans over JSON, backed by the shared SafeBaby database and the
//! external product/vision collaborators.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use safebaby_common::config::{self, ServiceConfig};
use safebaby_common::db::init::{get_setting_i64, init_database};
use safebaby_web::clients::{OpenFoodFactsClient, VisionClient};
use safebaby_web::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting SafeBaby web service (safebaby-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Resolve data folder and open (or create) the database
    let cli_data_dir = std::env::args().nth(1);
    let data_dir = config::resolve_data_dir(cli_data_dir.as_deref());
    config::ensure_data_dir(&data_dir)?;

    let db_path = config::database_path(&data_dir);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;
    info!("Database connection established");

    // Load service configuration (TOML + env overrides)
    let service_config = ServiceConfig::load(&data_dir)?;
    let vision_key = service_config.require_vision_key()?.to_string();

    // Construct external collaborators
    let product_source = Arc::new(
        OpenFoodFactsClient::new(service_config.product_api_base.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create product API client: {}", e))?,
    );
    let analyzer = Arc::new(
        VisionClient::new(service_config.vision_api_base.clone(), vision_key)
            .map_err(|e| anyhow::anyhow!("Failed to create vision client: {}", e))?,
    );

    // Scan timeout is settings-backed, with the config value as fallback
    let scan_timeout_ms = get_setting_i64(
        &pool,
        "scan_timeout_ms",
        service_config.scan_timeout_ms as i64,
    )
    .await?;
    let scan_timeout = Duration::from_millis(scan_timeout_ms.max(1) as u64);

    // Create application state and router
    let state = AppState::new(pool, product_source, analyzer, scan_timeout);
    let app = build_router(state);

    // Start server
    let bind_addr = format!("127.0.0.1:{}", service_config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("safebaby-web listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
