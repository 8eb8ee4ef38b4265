//! Open Food Facts product metadata client
//!
//! Looks up product name, brand, category and ingredient text by barcode.
//! A `status != 1` payload means the barcode is unknown to the database.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::{RateLimiter, USER_AGENT};
use crate::services::ExternalProduct;

const RATE_LIMIT_MS: u64 = 500; // 2 requests per second

/// Product API client errors
#[derive(Debug, Error)]
pub enum ProductApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Barcode lookup response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OffProductResponse {
    /// 1 when the product exists, 0 otherwise
    pub status: i32,
    pub product: Option<OffProduct>,
}

/// Product payload as returned by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OffProduct {
    pub code: Option<String>,
    pub product_name: Option<String>,
    pub brands: Option<String>,
    pub categories: Option<String>,
    pub ingredients_text: Option<String>,
}

/// Map an API product payload into the lookup's normalized shape
///
/// Products without a usable name are treated as not found.
pub fn product_to_external(barcode: &str, p: OffProduct) -> Option<ExternalProduct> {
    let name = p.product_name.filter(|n| !n.trim().is_empty())?;

    Some(ExternalProduct {
        barcode: p
            .code
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| barcode.to_string()),
        name,
        brand: p.brands.filter(|b| !b.is_empty()),
        category: p.categories.filter(|c| !c.is_empty()),
        ingredients: p.ingredients_text.filter(|i| !i.trim().is_empty()),
    })
}

/// Open Food Facts API client
pub struct OpenFoodFactsClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(base_url: String) -> Result<Self, ProductApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ProductApiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            base_url,
        })
    }

    /// Lookup a product by barcode
    ///
    /// Returns Ok(None) when the barcode is unknown to the database.
    pub async fn lookup_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<ExternalProduct>, ProductApiError> {
        // Rate limit
        self.rate_limiter.wait().await;

        let url = format!("{}/api/v0/product/{}.json", self.base_url, barcode);

        tracing::debug!(barcode = %barcode, url = %url, "Querying product API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProductApiError::NetworkError(e.to_string()))?;

        let status = response.status();

        // The API reports unknown barcodes with status 0 in the body, but
        // some gateways return a bare 404.
        if status == 404 {
            return Ok(None);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProductApiError::ApiError(status.as_u16(), error_text));
        }

        let payload: OffProductResponse = response
            .json()
            .await
            .map_err(|e| ProductApiError::ParseError(e.to_string()))?;

        if payload.status != 1 {
            return Ok(None);
        }

        let external = payload
            .product
            .and_then(|p| product_to_external(barcode, p));

        if let Some(product) = &external {
            tracing::info!(
                barcode = %barcode,
                name = %product.name,
                "Retrieved product from product API"
            );
        }

        Ok(external)
    }
}
