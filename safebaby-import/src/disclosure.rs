//! Manufacturer disclosure CSV parsing
//!
//! AB 899 disclosure pages publish per-product heavy-metal test results.
//! The scraped CSV carries one row per product: identity, lab metadata and
//! the four contaminant readings in ppb.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use safebaby_common::scoring::HeavyMetalLevels;

/// One product row from a disclosure CSV
#[derive(Debug, Clone, Deserialize)]
pub struct DisclosureRecord {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub barcode: String,
    #[serde(default)]
    pub description: Option<String>,
    pub lab_name: String,
    /// Test date, YYYY-MM-DD
    pub test_date: String,
    #[serde(default)]
    pub report_url: Option<String>,
    pub lead_ppb: f64,
    pub arsenic_ppb: f64,
    pub cadmium_ppb: f64,
    pub mercury_ppb: f64,
}

impl DisclosureRecord {
    pub fn levels(&self) -> HeavyMetalLevels {
        HeavyMetalLevels {
            lead: self.lead_ppb,
            arsenic: self.arsenic_ppb,
            cadmium: self.cadmium_ppb,
            mercury: self.mercury_ppb,
        }
    }
}

/// One recall row from an FDA recall CSV
#[derive(Debug, Clone, Deserialize)]
pub struct RecallRecord {
    pub barcode: String,
    pub reason: String,
    /// FDA risk class: I, II or III
    pub risk_class: String,
    /// Recall date, YYYY-MM-DD
    pub recall_date: String,
    #[serde(default)]
    pub fda_url: Option<String>,
}

/// Read disclosure rows from a CSV file
pub fn read_disclosures(path: &Path) -> Result<Vec<DisclosureRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open disclosure CSV: {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: DisclosureRecord = row.context("Malformed disclosure row")?;
        records.push(record);
    }

    Ok(records)
}

/// Read recall rows from a CSV file
pub fn read_recalls(path: &Path) -> Result<Vec<RecallRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open recall CSV: {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RecallRecord = row.context("Malformed recall row")?;
        records.push(record);
    }

    Ok(records)
}
