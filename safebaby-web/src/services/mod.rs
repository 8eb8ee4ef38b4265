//! Orchestration services and collaborator seams

pub mod lookup;
pub mod meal_plan;
pub mod scan;

pub use lookup::lookup_product;
pub use scan::{scan_product_photo, ScanOutcome};

use serde::{Deserialize, Serialize};

use crate::clients::{OpenFoodFactsClient, ProductApiError, VisionClient, VisionError};
use safebaby_common::types::ProductAnalysis;

/// Normalized product payload from the external metadata API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalProduct {
    pub barcode: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub ingredients: Option<String>,
}

/// Structured data recovered from a product photo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoExtraction {
    pub barcode: Option<String>,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub ingredients: Option<String>,
}

impl PhotoExtraction {
    /// Whether the photo yielded at least a partial product identity
    pub fn partially_recognized(&self) -> bool {
        self.product_name.is_some() || self.brand.is_some()
    }
}

/// External product metadata collaborator
#[async_trait::async_trait]
pub trait ProductSource: Send + Sync {
    /// Lookup a product by barcode; Ok(None) means unknown barcode
    async fn fetch_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<ExternalProduct>, ProductApiError>;
}

/// AI vision/analysis collaborator
#[async_trait::async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Extract structured product data from a base64-encoded photo
    async fn extract_from_photo(&self, photo_base64: &str)
        -> Result<PhotoExtraction, VisionError>;

    /// Analyze a product payload for heavy-metal risk
    async fn analyze_product(
        &self,
        product: &ExternalProduct,
    ) -> Result<ProductAnalysis, VisionError>;
}

#[async_trait::async_trait]
impl ProductSource for OpenFoodFactsClient {
    async fn fetch_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<ExternalProduct>, ProductApiError> {
        self.lookup_barcode(barcode).await
    }
}

#[async_trait::async_trait]
impl AnalysisProvider for VisionClient {
    async fn extract_from_photo(
        &self,
        photo_base64: &str,
    ) -> Result<PhotoExtraction, VisionError> {
        VisionClient::extract_from_photo(self, photo_base64).await
    }

    async fn analyze_product(
        &self,
        product: &ExternalProduct,
    ) -> Result<ProductAnalysis, VisionError> {
        VisionClient::analyze_product(self, product).await
    }
}
