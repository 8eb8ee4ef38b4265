//! Product lookup waterfall
//!
//! Given a barcode, return the best available safety information with
//! minimal redundant external calls. Tiers, in strict precedence order:
//!
//! 1. Lab-tested products in the local database (terminates the search)
//! 2. Cached AI analyses keyed by barcode
//! 3. External product API, then AI analysis, with the result written back
//!    to the cache best-effort
//!
//! Lab data always outranks AI-inferred data regardless of recency. A
//! failure at any tier is logged and degrades to the next tier; only
//! invalid input aborts early, before any database or network call.

use sqlx::SqlitePool;
use tracing::warn;

use super::{AnalysisProvider, ProductSource};
use crate::db::{analysis_cache, products};
use safebaby_common::barcode::normalize_barcode;
use safebaby_common::types::LookupResult;

/// Suggestion shown when no tier knows the barcode
const NOT_FOUND_SUGGESTION: &str =
    "We don't have data for this product yet. Try searching for it by name, \
     or scan a photo of the package.";

/// Suggestion shown when the AI analysis call fails
const ANALYSIS_FAILED_SUGGESTION: &str =
    "We found this product but couldn't analyze it right now. Please try \
     again in a few minutes.";

/// Run the lookup waterfall for a raw barcode string
pub async fn lookup_product(
    db: &SqlitePool,
    source: &dyn ProductSource,
    analyzer: &dyn AnalysisProvider,
    raw_barcode: &str,
) -> LookupResult {
    // Invalid input is rejected synchronously, before any collaborator call
    let Some(barcode) = normalize_barcode(raw_barcode) else {
        return LookupResult::Error {
            message: format!(
                "Invalid barcode: expected 8-14 digits, got {:?}",
                raw_barcode
            ),
        };
    };

    // Tier 1: lab-tested products. Highest trust; terminates the search.
    match products::find_detail_by_barcode(db, &barcode).await {
        Ok(Some(detail)) => {
            return LookupResult::LabTested {
                barcode,
                has_lab_results: detail.has_lab_results(),
                product: detail,
            };
        }
        Ok(None) => {}
        Err(e) => {
            warn!(barcode = %barcode, error = %e, "Lab-tested lookup failed, trying cache");
        }
    }

    // Tier 2: cached AI analysis. No external call on a hit.
    match analysis_cache::get_by_barcode(db, &barcode).await {
        Ok(Some(analysis)) => {
            return LookupResult::AiAnalyzed {
                barcode,
                cached: true,
                is_new_analysis: false,
                analysis,
            };
        }
        Ok(None) => {}
        Err(e) => {
            warn!(barcode = %barcode, error = %e, "Cache lookup failed, trying external API");
        }
    }

    // Tier 3: external product metadata API
    let external = match source.fetch_by_barcode(&barcode).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            return LookupResult::NotFound {
                barcode,
                suggestion: NOT_FOUND_SUGGESTION.to_string(),
            };
        }
        Err(e) => {
            warn!(barcode = %barcode, error = %e, "Product API call failed");
            return LookupResult::NotFound {
                barcode,
                suggestion: NOT_FOUND_SUGGESTION.to_string(),
            };
        }
    };

    // Tier 4: AI analysis of the external payload
    let analysis = match analyzer.analyze_product(&external).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(barcode = %barcode, error = %e, "AI analysis failed");
            return LookupResult::AnalysisFailed {
                barcode,
                product_name: Some(external.name),
                suggestion: ANALYSIS_FAILED_SUGGESTION.to_string(),
            };
        }
    };

    // Tier 5: best-effort cache write-back. Failure is logged, never surfaced.
    if let Err(e) = analysis_cache::upsert(db, &barcode, &analysis).await {
        warn!(barcode = %barcode, error = %e, "Cache write failed (lookup still succeeds)");
    }

    LookupResult::AiAnalyzed {
        barcode,
        cached: false,
        is_new_analysis: true,
        analysis,
    }
}
