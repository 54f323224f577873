//! HTTP server layer
//!
//! Axum server with:
//! - CORS (configured origins only unless permissive)
//! - Request tracing and logging
//! - Per-caller rate limiting
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use server::{build_router, serve, AppState};
