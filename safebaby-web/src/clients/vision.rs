//! AI vision/analysis API client
//!
//! Two calls against the hosted model: photo -> structured product data
//! (barcode, name, brand, ingredient text), and product payload -> safety
//! analysis (estimated score, summary, concerns).

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::{RateLimiter, USER_AGENT};
use crate::services::{ExternalProduct, PhotoExtraction};
use safebaby_common::types::ProductAnalysis;

const RATE_LIMIT_MS: u64 = 200;

/// Vision/analysis client errors
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid photo payload: {0}")]
    InvalidPhoto(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid API key")]
    InvalidApiKey,
}

/// Photo extraction response payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionResponse {
    pub barcode: Option<String>,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub ingredients_text: Option<String>,
}

/// Safety analysis response payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisResponse {
    pub safety_score: i64,
    pub summary: String,
    #[serde(default)]
    pub concerns: Vec<String>,
}

/// AI vision/analysis API client
pub struct VisionClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: String,
    api_key: String,
}

impl VisionClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VisionError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            base_url,
            api_key,
        })
    }

    /// Extract structured product data from a base64-encoded photo
    pub async fn extract_from_photo(
        &self,
        photo_base64: &str,
    ) -> Result<PhotoExtraction, VisionError> {
        // Reject garbage before spending a network call
        base64::engine::general_purpose::STANDARD
            .decode(photo_base64)
            .map_err(|e| VisionError::InvalidPhoto(e.to_string()))?;

        self.rate_limiter.wait().await;

        let url = format!("{}/extract", self.base_url);

        tracing::debug!(url = %url, "Requesting photo extraction");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "image": photo_base64 }))
            .send()
            .await
            .map_err(|e| VisionError::NetworkError(e.to_string()))?;

        let extraction: ExtractionResponse = Self::parse_response(response).await?;

        tracing::info!(
            barcode = extraction.barcode.as_deref().unwrap_or("-"),
            name = extraction.product_name.as_deref().unwrap_or("-"),
            "Photo extraction complete"
        );

        Ok(PhotoExtraction {
            barcode: extraction.barcode,
            product_name: extraction.product_name,
            brand: extraction.brand,
            ingredients: extraction.ingredients_text,
        })
    }

    /// Analyze a product's ingredient text for heavy-metal risk
    pub async fn analyze_product(
        &self,
        product: &ExternalProduct,
    ) -> Result<ProductAnalysis, VisionError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/analyze", self.base_url);

        tracing::debug!(url = %url, name = %product.name, "Requesting safety analysis");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "name": product.name,
                "brand": product.brand,
                "ingredients": product.ingredients,
            }))
            .send()
            .await
            .map_err(|e| VisionError::NetworkError(e.to_string()))?;

        let analysis: AnalysisResponse = Self::parse_response(response).await?;

        tracing::info!(
            name = %product.name,
            score = analysis.safety_score,
            "Safety analysis complete"
        );

        Ok(ProductAnalysis {
            product_name: product.name.clone(),
            brand: product.brand.clone(),
            ingredients: product.ingredients.clone(),
            safety_score: analysis.safety_score.clamp(0, 100),
            summary: analysis.summary,
            concerns: analysis.concerns,
        })
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, VisionError> {
        let status = response.status();

        if status == 401 {
            return Err(VisionError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VisionError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| VisionError::ParseError(e.to_string()))
    }
}
