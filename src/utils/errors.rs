//! Error handling for HotelConsole
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for HotelConsole application
#[derive(Error, Debug)]
pub enum HotelConsoleError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Auth service error: {0}")]
    AuthApi(#[from] AuthApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid access token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Profile not found: {profile_id}")]
    ProfileNotFound { profile_id: Uuid },

    #[error("Hotel not found: {hotel_id}")]
    HotelNotFound { hotel_id: i64 },

    #[error("Room not found: {room_id}")]
    RoomNotFound { room_id: i64 },

    #[error("Reservation not found: {reservation_id}")]
    ReservationNotFound { reservation_id: i64 },

    #[error("Payment not found: {payment_id}")]
    PaymentNotFound { payment_id: i64 },

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Errors reported by the hosted auth service's admin API
#[derive(Error, Debug)]
pub enum AuthApiError {
    #[error("{message} (status {status})")]
    RequestFailed { status: u16, message: String },

    #[error("Auth API timeout")]
    Timeout,

    #[error("Invalid auth API response: {0}")]
    InvalidResponse(String),

    #[error("Auth service unavailable")]
    ServiceUnavailable,
}

/// Errors reported while storing uploaded images
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("{message} (status {status})")]
    UploadFailed { status: u16, message: String },

    #[error("Storage timeout")]
    Timeout,

    #[error("Storage service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for HotelConsole operations
pub type Result<T> = std::result::Result<T, HotelConsoleError>;

/// Result type alias for auth admin API operations
pub type AuthApiResult<T> = std::result::Result<T, AuthApiError>;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// Postgres SQLSTATE codes the console reports back to the user
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

impl From<sqlx::Error> for HotelConsoleError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return HotelConsoleError::Conflict(format!(
                        "A record with the same values already exists ({})",
                        constraint
                    ));
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return HotelConsoleError::InvalidInput(format!(
                        "Referenced record does not exist or is still in use ({})",
                        constraint
                    ));
                }
                Some(CHECK_VIOLATION) => {
                    return HotelConsoleError::InvalidInput(format!(
                        "Value out of range ({})",
                        constraint
                    ));
                }
                _ => {}
            }
        }

        HotelConsoleError::Database(err)
    }
}

impl HotelConsoleError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            HotelConsoleError::Database(_) => false,
            HotelConsoleError::Migration(_) => false,
            HotelConsoleError::AuthApi(_) => true,
            HotelConsoleError::Storage(_) => true,
            HotelConsoleError::Config(_) => false,
            HotelConsoleError::Authentication(_) => false,
            HotelConsoleError::Token(_) => false,
            HotelConsoleError::PermissionDenied(_) => false,
            HotelConsoleError::ProfileNotFound { .. } => false,
            HotelConsoleError::HotelNotFound { .. } => false,
            HotelConsoleError::RoomNotFound { .. } => false,
            HotelConsoleError::ReservationNotFound { .. } => false,
            HotelConsoleError::PaymentNotFound { .. } => false,
            HotelConsoleError::Validation(_) => false,
            HotelConsoleError::InvalidInput(_) => false,
            HotelConsoleError::Conflict(_) => false,
            HotelConsoleError::PayloadTooLarge { .. } => false,
            HotelConsoleError::Redis(_) => true,
            HotelConsoleError::Http(_) => true,
            HotelConsoleError::Serialization(_) => false,
            HotelConsoleError::Io(_) => true,
            HotelConsoleError::UrlParse(_) => false,
            HotelConsoleError::RateLimitExceeded => true,
            HotelConsoleError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HotelConsoleError::Database(_) => ErrorSeverity::Critical,
            HotelConsoleError::Migration(_) => ErrorSeverity::Critical,
            HotelConsoleError::Config(_) => ErrorSeverity::Critical,
            HotelConsoleError::PermissionDenied(_) => ErrorSeverity::Warning,
            HotelConsoleError::Authentication(_) => ErrorSeverity::Warning,
            HotelConsoleError::Token(_) => ErrorSeverity::Warning,
            HotelConsoleError::RateLimitExceeded => ErrorSeverity::Warning,
            HotelConsoleError::Validation(_)
            | HotelConsoleError::InvalidInput(_)
            | HotelConsoleError::Conflict(_)
            | HotelConsoleError::PayloadTooLarge { .. }
            | HotelConsoleError::ProfileNotFound { .. }
            | HotelConsoleError::HotelNotFound { .. }
            | HotelConsoleError::RoomNotFound { .. }
            | HotelConsoleError::ReservationNotFound { .. }
            | HotelConsoleError::PaymentNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels, least severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
