//! Lookup result envelope types shared between services
//!
//! The `type` discriminator mirrors what the page-rendering layer consumes:
//! `lab_tested | ai_analyzed | not_found | analysis_failed | error`.

use crate::db::models::{Contaminant, LabResult, Product, Recall};
use serde::{Deserialize, Serialize};

/// A lab result with its contaminant readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabResultDetail {
    #[serde(flatten)]
    pub lab_result: LabResult,
    pub contaminants: Vec<Contaminant>,
}

/// A product with its lab results and recalls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub lab_results: Vec<LabResultDetail>,
    pub recalls: Vec<Recall>,
}

impl ProductDetail {
    pub fn has_lab_results(&self) -> bool {
        !self.lab_results.is_empty()
    }
}

/// AI-inferred safety analysis for a product without lab data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub product_name: String,
    pub brand: Option<String>,
    pub ingredients: Option<String>,
    /// Estimated safety score (0-100, higher is safer)
    pub safety_score: i64,
    /// Plain-language summary of the analysis
    pub summary: String,
    /// Specific ingredient concerns, possibly empty
    pub concerns: Vec<String>,
}

/// Result envelope for a barcode lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LookupResult {
    /// Locally curated product backed by real laboratory data.
    /// Highest-trust tier; terminates the lookup.
    LabTested {
        barcode: String,
        has_lab_results: bool,
        product: ProductDetail,
    },
    /// Safety analysis inferred by the AI model from ingredient text
    AiAnalyzed {
        barcode: String,
        cached: bool,
        #[serde(default)]
        is_new_analysis: bool,
        analysis: ProductAnalysis,
    },
    /// Barcode unknown to every tier
    NotFound { barcode: String, suggestion: String },
    /// External product data found, but the AI analysis call failed
    AnalysisFailed {
        barcode: String,
        product_name: Option<String>,
        suggestion: String,
    },
    /// Invalid input; rejected before any database or network call
    Error { message: String },
}

impl LookupResult {
    /// The `type` discriminator as a string, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            LookupResult::LabTested { .. } => "lab_tested",
            LookupResult::AiAnalyzed { .. } => "ai_analyzed",
            LookupResult::NotFound { .. } => "not_found",
            LookupResult::AnalysisFailed { .. } => "analysis_failed",
            LookupResult::Error { .. } => "error",
        }
    }
}
