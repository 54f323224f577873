//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::net::SocketAddr;

use regex::Regex;

use crate::utils::errors::{HotelConsoleError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;
    validate_rate_limit_config(&settings.rate_limit)?;

    if settings.features.summary_cache {
        validate_redis_config(&settings.redis)?;
    }

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    config.bind_addr.parse::<SocketAddr>().map_err(|_| {
        HotelConsoleError::Config(format!("Invalid bind address: {}", config.bind_addr))
    })?;

    for origin in &config.allowed_origins {
        url::Url::parse(origin).map_err(|_| {
            HotelConsoleError::Config(format!("Invalid allowed origin: {}", origin))
        })?;
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(HotelConsoleError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(HotelConsoleError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(HotelConsoleError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(HotelConsoleError::Config(
            "Redis URL is required when the summary cache is enabled".to_string()
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(HotelConsoleError::Config(
            "Redis TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate auth service configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 32 {
        return Err(HotelConsoleError::Config(
            "JWT secret must be at least 32 characters".to_string()
        ));
    }

    if config.jwt_audience.is_empty() {
        return Err(HotelConsoleError::Config(
            "JWT audience is required".to_string()
        ));
    }

    url::Url::parse(&config.api_url)
        .map_err(|e| HotelConsoleError::Config(format!("Invalid auth API URL: {}", e)))?;

    if config.service_key.is_empty() {
        return Err(HotelConsoleError::Config(
            "Auth service key is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(HotelConsoleError::Config(
            "Auth timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    url::Url::parse(&config.api_url)
        .map_err(|e| HotelConsoleError::Config(format!("Invalid storage API URL: {}", e)))?;

    if config.bucket.is_empty() {
        return Err(HotelConsoleError::Config(
            "Storage bucket is required".to_string()
        ));
    }

    let bucket_pattern = Regex::new(r"^[a-z0-9][a-z0-9._-]{0,62}$")
        .map_err(|e| HotelConsoleError::Config(format!("Invalid bucket pattern: {}", e)))?;
    if !bucket_pattern.is_match(&config.bucket) {
        return Err(HotelConsoleError::Config(format!(
            "Invalid storage bucket name: {}",
            config.bucket
        )));
    }

    if config.service_key.is_empty() {
        return Err(HotelConsoleError::Config(
            "Storage service key is required".to_string()
        ));
    }

    if config.max_upload_bytes == 0 {
        return Err(HotelConsoleError::Config(
            "Max upload size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(HotelConsoleError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(HotelConsoleError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate rate limit configuration
fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.requests_per_minute == 0 {
        return Err(HotelConsoleError::Config(
            "Requests per minute must be greater than 0".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "an-extremely-secret-signing-key-0123456789".to_string();
        settings.auth.service_key = "service-role".to_string();
        settings.storage.service_key = "service-role".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = "short".to_string();
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("JWT secret"));
    }

    #[test]
    fn test_bucket_name_rules() {
        let mut settings = valid_settings();
        settings.storage.bucket = "Hotel Images".to_string();
        assert!(validate_settings(&settings).is_err());

        settings.storage.bucket = "hotel-images.v2".to_string();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_bad_bind_address_rejected() {
        let mut settings = valid_settings();
        settings.server.bind_addr = "not-an-address".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_min_connections_above_max_rejected() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_redis_only_checked_when_cache_enabled() {
        let mut settings = valid_settings();
        settings.redis.url = String::new();
        assert!(validate_settings(&settings).is_ok());

        settings.features.summary_cache = true;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "loud".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
