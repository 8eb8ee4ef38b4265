//! Database access for safebaby-web

pub mod analysis_cache;
pub mod favorites;
pub mod meal_plans;
pub mod products;
pub mod profiles;
pub mod recalls;
