//! Photo scan orchestrator
//!
//! Wraps photo extraction plus the lookup waterfall in a single fixed
//! timeout. On timeout the in-flight work is abandoned, not cancelled; a
//! late result is simply discarded with the dropped future.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{info, warn};

use super::{lookup_product, AnalysisProvider, PhotoExtraction, ProductSource};
use safebaby_common::types::LookupResult;

/// Result envelope for a photo scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A barcode was recovered and the lookup waterfall ran
    Product { lookup: Box<LookupResult> },
    /// Extraction failed or yielded no usable barcode
    ExtractionFailed {
        recognized_name: Option<String>,
        recognized_brand: Option<String>,
        suggestion: String,
    },
    /// The scan exceeded the time budget
    TimedOut { suggestion: String },
}

const TIMEOUT_SUGGESTION: &str =
    "The scan took too long. Check your connection and try again.";

const UNRECOGNIZED_SUGGESTION: &str =
    "We couldn't identify this product. Try a clearer photo of the barcode.";

fn partial_suggestion(extraction: &PhotoExtraction) -> String {
    let label = match (&extraction.product_name, &extraction.brand) {
        (Some(name), Some(brand)) => format!("{} by {}", name, brand),
        (Some(name), None) => name.clone(),
        (None, Some(brand)) => format!("a {} product", brand),
        (None, None) => return UNRECOGNIZED_SUGGESTION.to_string(),
    };
    format!(
        "We couldn't read a barcode, but this looks like {}. Try searching for it by name.",
        label
    )
}

/// Scan a base64-encoded product photo
pub async fn scan_product_photo(
    db: &SqlitePool,
    source: &dyn ProductSource,
    analyzer: &dyn AnalysisProvider,
    photo_base64: &str,
    timeout: Duration,
) -> ScanOutcome {
    let scan = run_scan(db, source, analyzer, photo_base64);

    match tokio::time::timeout(timeout, scan).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Photo scan timed out");
            ScanOutcome::TimedOut {
                suggestion: TIMEOUT_SUGGESTION.to_string(),
            }
        }
    }
}

async fn run_scan(
    db: &SqlitePool,
    source: &dyn ProductSource,
    analyzer: &dyn AnalysisProvider,
    photo_base64: &str,
) -> ScanOutcome {
    let extraction = match analyzer.extract_from_photo(photo_base64).await {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!(error = %e, "Photo extraction failed");
            return ScanOutcome::ExtractionFailed {
                recognized_name: None,
                recognized_brand: None,
                suggestion: UNRECOGNIZED_SUGGESTION.to_string(),
            };
        }
    };

    let Some(barcode) = extraction.barcode.clone() else {
        // Distinct suggestions depending on whether anything was recognized
        let suggestion = if extraction.partially_recognized() {
            partial_suggestion(&extraction)
        } else {
            UNRECOGNIZED_SUGGESTION.to_string()
        };
        return ScanOutcome::ExtractionFailed {
            recognized_name: extraction.product_name,
            recognized_brand: extraction.brand,
            suggestion,
        };
    };

    info!(barcode = %barcode, "Photo yielded a barcode, running lookup");

    let mut lookup = lookup_product(db, source, analyzer, &barcode).await;

    // Ingredient text read off the physical package outranks what the
    // external source reports.
    if let LookupResult::AiAnalyzed { analysis, .. } = &mut lookup {
        if let Some(photo_ingredients) = &extraction.ingredients {
            analysis.ingredients = Some(photo_ingredients.clone());
        }
    }

    ScanOutcome::Product {
        lookup: Box::new(lookup),
    }
}
