//! Redis integration service implementation
//!
//! Short-lived JSON cache for dashboard summaries. Keys are namespaced with
//! the configured prefix and expire after the configured TTL.

use redis::{AsyncCommands, Client, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use crate::config::RedisConfig;
use crate::utils::errors::{HotelConsoleError, Result};

/// Redis service for caching
#[derive(Clone, Debug)]
pub struct RedisService {
    client: Client,
    config: RedisConfig,
}

impl RedisService {
    /// Create a new RedisService instance
    pub fn new(config: RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str()).map_err(HotelConsoleError::Redis)?;
        Ok(Self { client, config })
    }

    /// Get Redis connection
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(HotelConsoleError::Redis)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    /// Set a value with the configured TTL unless one is given
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let mut conn = self.get_connection().await?;
        let serialized = serde_json::to_string(value)?;

        let full_key = self.full_key(key);
        let ttl = ttl_seconds.unwrap_or(self.config.ttl_seconds);

        let _: () = conn.set_ex(&full_key, serialized, ttl).await?;

        debug!(key = %full_key, ttl = ttl, "Value set in Redis");
        Ok(())
    }

    /// Get a value; unreadable entries count as missing
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut conn = self.get_connection().await?;
        let full_key = self.full_key(key);

        let cached: Option<String> = conn.get(&full_key).await?;
        let Some(data) = cached else {
            debug!(key = %full_key, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_str::<T>(&data) {
            Ok(value) => {
                debug!(key = %full_key, "Cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(key = %full_key, error = %e, "Dropping unreadable cache entry");
                let _: () = conn.del(&full_key).await?;
                Ok(None)
            }
        }
    }

    /// Health check for Redis connection
    pub async fn health_check(&self) -> bool {
        match self.get_connection().await {
            Ok(mut conn) => {
                let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                match result {
                    Ok(response) => response == "PONG",
                    Err(e) => {
                        warn!(error = %e, "Redis health check failed");
                        false
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Redis connection failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_carry_prefix() {
        let service = RedisService::new(RedisConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            prefix: "hotel_console:".to_string(),
            ttl_seconds: 60,
        })
        .unwrap();
        assert_eq!(service.full_key("summary:admin"), "hotel_console:summary:admin");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = RedisService::new(RedisConfig {
            url: "not a url".to_string(),
            prefix: String::new(),
            ttl_seconds: 60,
        });
        assert!(matches!(result, Err(HotelConsoleError::Redis(_))));
    }
}
