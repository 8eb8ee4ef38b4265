//! Safety score formula
//!
//! Converts per-contaminant readings into a single 0-100 score. Each
//! contaminant contributes `min(amount/limit, 1) * 100`, combined with a
//! fixed weighted average, and the score is `round(100 - weighted)`.
//!
//! One canonical weight table is used everywhere (web service and import
//! tool); the weights sum to 1.0.

use serde::{Deserialize, Serialize};

/// Contaminant weights (must sum to 1.0)
pub const LEAD_WEIGHT: f64 = 0.35;
pub const ARSENIC_WEIGHT: f64 = 0.25;
pub const CADMIUM_WEIGHT: f64 = 0.25;
pub const MERCURY_WEIGHT: f64 = 0.15;

/// The four tracked heavy metals, in weight order
pub const CONTAMINANT_NAMES: [&str; 4] = ["Lead", "Arsenic", "Cadmium", "Mercury"];

/// Measured heavy-metal concentrations, in ppb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeavyMetalLevels {
    pub lead: f64,
    pub arsenic: f64,
    pub cadmium: f64,
    pub mercury: f64,
}

/// Per-contaminant safety limits, in ppb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyLimits {
    pub lead: f64,
    pub arsenic: f64,
    pub cadmium: f64,
    pub mercury: f64,
}

impl Default for SafetyLimits {
    /// Default action limits for baby food, in ppb
    fn default() -> Self {
        Self {
            lead: 10.0,
            arsenic: 100.0,
            cadmium: 5.0,
            mercury: 2.0,
        }
    }
}

/// Percentage of the safety limit consumed by a reading, capped at 100
pub fn percent_of_limit(amount_ppb: f64, limit_ppb: f64) -> f64 {
    if limit_ppb <= 0.0 {
        return 100.0;
    }
    (amount_ppb / limit_ppb).min(1.0) * 100.0
}

/// Whether a reading exceeds its safety limit
pub fn exceeds_limit(amount_ppb: f64, limit_ppb: f64) -> bool {
    amount_ppb > limit_ppb
}

/// Compute the overall safety score (0-100, higher is safer)
pub fn safety_score(levels: HeavyMetalLevels, limits: SafetyLimits) -> i64 {
    let weighted = percent_of_limit(levels.lead, limits.lead) * LEAD_WEIGHT
        + percent_of_limit(levels.arsenic, limits.arsenic) * ARSENIC_WEIGHT
        + percent_of_limit(levels.cadmium, limits.cadmium) * CADMIUM_WEIGHT
        + percent_of_limit(levels.mercury, limits.mercury) * MERCURY_WEIGHT;

    (100.0 - weighted).round().clamp(0.0, 100.0) as i64
}

/// Static health-impact text for a contaminant name
///
/// Returns None for contaminants outside the tracked set.
pub fn health_impact(name: &str) -> Option<&'static str> {
    match name {
        "Lead" => Some(
            "Lead exposure can harm brain development and has no known safe level for infants.",
        ),
        "Arsenic" => Some(
            "Inorganic arsenic is linked to reduced IQ and developmental delays in young children.",
        ),
        "Cadmium" => Some(
            "Cadmium accumulates in the kidneys and can affect bone development over time.",
        ),
        "Mercury" => Some(
            "Mercury is toxic to the developing nervous system, even at low concentrations.",
        ),
        _ => None,
    }
}
