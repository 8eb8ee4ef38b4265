//! Database schema, models and initialization

pub mod init;
pub mod models;

pub use init::*;
pub use models::*;
