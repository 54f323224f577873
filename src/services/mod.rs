//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod dashboard;
pub mod hotel;
pub mod redis;
pub mod reservation;
pub mod room;
pub mod storage;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthContext, AuthService, Claims, Permission, TokenVerifier, permission_includes};
pub use dashboard::DashboardService;
pub use hotel::HotelService;
pub use self::redis::RedisService;
pub use reservation::ReservationService;
pub use room::RoomService;
pub use storage::{ImageUpload, StorageService, StoredObject};
pub use user::{AuthAdminClient, UserService};

use serde::Serialize;
use tracing::warn;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub hotel_service: HotelService,
    pub room_service: RoomService,
    pub reservation_service: ReservationService,
    pub dashboard_service: DashboardService,
    pub redis_service: Option<RedisService>,
    database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, database: DatabaseService) -> Result<Self> {
        let storage = StorageService::new(settings.storage.clone())?;
        let admin_api = AuthAdminClient::new(settings.auth.clone())?;

        let redis_service = if settings.features.summary_cache {
            Some(RedisService::new(settings.redis.clone())?)
        } else {
            None
        };

        Ok(Self {
            auth_service: AuthService::new(&settings.auth, database.profiles.clone()),
            user_service: UserService::new(database.profiles.clone(), admin_api),
            hotel_service: HotelService::new(database.hotels.clone(), storage.clone()),
            room_service: RoomService::new(database.rooms.clone(), database.hotels.clone(), storage),
            reservation_service: ReservationService::new(database.clone()),
            dashboard_service: DashboardService::new(database.dashboard.clone(), redis_service.clone()),
            redis_service,
            database,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = match self.database.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            }
        };

        let redis_healthy = match &self.redis_service {
            Some(redis) => Some(redis.health_check().await),
            None => None,
        };

        ServiceHealthStatus {
            database_healthy,
            redis_healthy,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    /// `None` when the summary cache is disabled
    pub redis_healthy: Option<bool>,
}

impl ServiceHealthStatus {
    /// The cache is optional; only the database decides overall health
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database unreachable".to_string());
        }
        if self.redis_healthy == Some(false) {
            issues.push("Redis connection failed".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_outage_is_an_issue_but_not_unhealthy() {
        let status = ServiceHealthStatus { database_healthy: true, redis_healthy: Some(false) };
        assert!(status.is_healthy());
        assert_eq!(status.get_issues(), vec!["Redis connection failed".to_string()]);

        let status = ServiceHealthStatus { database_healthy: false, redis_healthy: None };
        assert!(!status.is_healthy());
        assert_eq!(status.get_issues().len(), 1);
    }
}
