//! Database models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub guid: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    /// Unique business key (8-14 digits)
    pub barcode: String,
    pub description: Option<String>,
    /// Overall safety score, 0-100
    pub overall_score: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabResult {
    pub guid: String,
    pub product_guid: String,
    pub lab_name: String,
    /// Test date, YYYY-MM-DD
    pub test_date: String,
    pub report_url: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contaminant {
    pub guid: String,
    pub lab_result_guid: String,
    /// Lead, Arsenic, Cadmium or Mercury
    pub name: String,
    pub amount_ppb: f64,
    pub unit: String,
    pub limit_ppb: f64,
    pub exceeds_limit: bool,
    pub health_impact: Option<String>,
}

/// Cached AI analysis, at most one row per barcode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedProduct {
    pub barcode: String,
    pub product_name: String,
    pub brand: Option<String>,
    pub ingredients: Option<String>,
    pub safety_score: i64,
    pub summary: String,
    /// JSON array of concern strings
    pub concerns: String,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recall {
    pub guid: String,
    pub product_guid: String,
    pub reason: String,
    /// FDA risk class: I, II or III
    pub risk_class: String,
    /// Recall date, YYYY-MM-DD
    pub recall_date: String,
    pub fda_url: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub guid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// "free" or "premium"; gates the favorites limit
    pub subscription_tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFavorite {
    pub user_guid: String,
    pub product_guid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub guid: String,
    pub user_guid: String,
    /// Monday of the planned week, YYYY-MM-DD
    pub week_start: String,
    /// JSON map of "day.slot" -> product guid
    pub assignments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
