//! HTTP API handlers for safebaby-web

pub mod favorites;
pub mod health;
pub mod lookup;
pub mod meal_plan;
pub mod products;
pub mod recalls;
pub mod scan;
pub mod search;

pub use favorites::favorite_routes;
pub use health::health_routes;
pub use lookup::lookup_routes;
pub use meal_plan::meal_plan_routes;
pub use products::product_routes;
pub use recalls::recall_routes;
pub use scan::scan_routes;
pub use search::search_routes;
