//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
    pub cors_permissive: bool,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Hosted authentication service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Shared secret the auth service signs access tokens with (HS256)
    pub jwt_secret: String,
    pub jwt_audience: String,
    /// Base URL of the auth REST API, e.g. `https://project.example.co/auth/v1`
    pub api_url: String,
    /// Service-role key used for privileged admin calls
    pub service_key: String,
    pub timeout_seconds: u64,
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base URL of the storage REST API, e.g. `https://project.example.co/storage/v1`
    pub api_url: String,
    pub bucket: String,
    pub service_key: String,
    pub max_upload_bytes: usize,
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for rolling log files; empty disables file output
    pub file_path: String,
    pub json: bool,
}

/// Request rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub summary_cache: bool,
    pub rate_limit: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Nested keys use a double underscore, e.g. `HOTEL_CONSOLE__DATABASE__URL`.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_file("config")
    }

    /// Load settings from a specific file (extension optional) layered over defaults
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("HOTEL_CONSOLE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::HotelConsoleError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1:8080".to_string(),
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
                cors_permissive: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/hotel_console".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "hotel_console:".to_string(),
                ttl_seconds: 60,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
                api_url: "http://localhost:9999".to_string(),
                service_key: String::new(),
                timeout_seconds: 10,
            },
            storage: StorageConfig {
                api_url: "http://localhost:5000".to_string(),
                bucket: "hotel-images".to_string(),
                service_key: String::new(),
                max_upload_bytes: 5 * 1024 * 1024,
                timeout_seconds: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: String::new(),
                json: false,
            },
            rate_limit: RateLimitConfig {
                requests_per_minute: 120,
                burst: 30,
            },
            features: FeaturesConfig {
                summary_cache: false,
                rate_limit: true,
            },
        }
    }
}
