//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the HotelConsole application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use uuid::Uuid;
use crate::config::LoggingConfig;
use crate::utils::errors::{HotelConsoleError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = if config.file_path.is_empty() {
        (None, None)
    } else {
        let file_appender = tracing_appender::rolling::daily(&config.file_path, "hotel-console.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(non_blocking);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| HotelConsoleError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admin actions with structured data
pub fn log_admin_action(admin_id: Uuid, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = %admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log reservation management actions
pub fn log_reservation_action(reservation_id: i64, action: &str, user_id: Uuid, details: Option<&str>) {
    info!(
        reservation_id = reservation_id,
        action = action,
        user_id = %user_id,
        details = details,
        "Reservation action performed"
    );
}

/// Log catalog (hotel/room) changes
pub fn log_catalog_change(entity: &str, entity_id: i64, action: &str, user_id: Uuid) {
    info!(
        entity = entity,
        entity_id = entity_id,
        action = action,
        user_id = %user_id,
        "Catalog change"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
