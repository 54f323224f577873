//! HotelConsole
//!
//! Backend for a hotel booking management console. Administrators manage
//! every hotel and the user accounts; partners manage the hotels they own,
//! their rooms, reservations, payments and staff notes.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod http;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{HotelConsoleError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use http::{build_router, AppState};
pub use services::ServiceFactory;

/// Crate version, reported by `/health`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name and version for startup logs
pub fn info() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), VERSION)
}
