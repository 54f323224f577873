//! User management service implementation
//!
//! Profiles live in the console database while credentials live in the
//! hosted auth service. Creating or deleting a user touches both, through the
//! auth service's admin REST API using the service key.

use std::time::Duration;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;
use crate::config::AuthConfig;
use crate::database::ProfileRepository;
use crate::models::{
    CreateUserRequest, NewProfile, Paginated, Pagination, Profile, ProfileFilter, UpdateOwnProfileRequest,
    UpdateProfileRequest,
};
use crate::services::auth::AuthContext;
use crate::utils::errors::{AuthApiError, AuthApiResult, HotelConsoleError, Result};
use crate::utils::helpers::{generate_random_string, upstream_error_message};
use crate::utils::logging::{log_admin_action, log_api_error};

/// Length of passwords generated for invited users
pub const GENERATED_PASSWORD_LENGTH: usize = 16;

#[derive(Debug, Serialize)]
struct UserMetadata<'a> {
    full_name: &'a str,
    role: &'a str,
}

#[derive(Debug, Serialize)]
struct AdminCreateUser<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
    user_metadata: UserMetadata<'a>,
}

/// Client for the auth service's admin endpoints
#[derive(Clone, Debug)]
pub struct AuthAdminClient {
    client: Client,
    config: AuthConfig,
}

impl AuthAdminClient {
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("HotelConsole/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HotelConsoleError::Http)?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/admin/users{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Create an auth user and return its id
    pub async fn create_user(&self, email: &str, password: &str, full_name: &str, role: &str) -> AuthApiResult<Uuid> {
        let body = AdminCreateUser {
            email,
            password,
            email_confirm: true,
            user_metadata: UserMetadata { full_name, role },
        };

        debug!(email = %email, "Creating auth user");
        let response = self.client
            .post(self.endpoint(""))
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| AuthApiError::InvalidResponse(e.to_string()))?;

        // some deployments wrap the user in a "user" object
        let id = payload
            .get("id")
            .or_else(|| payload.get("user").and_then(|user| user.get("id")))
            .and_then(Value::as_str)
            .ok_or_else(|| AuthApiError::InvalidResponse("response carries no user id".to_string()))?;

        Uuid::parse_str(id).map_err(|e| AuthApiError::InvalidResponse(e.to_string()))
    }

    /// Delete an auth user; an already missing user counts as deleted
    pub async fn delete_user(&self, user_id: Uuid) -> AuthApiResult<()> {
        debug!(user_id = %user_id, "Deleting auth user");
        let response = self.client
            .delete(self.endpoint(&format!("/{}", user_id)))
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            warn!(user_id = %user_id, "Auth user already gone");
            return Ok(());
        }

        check_status(response).await?;
        Ok(())
    }
}

fn map_transport_error(e: reqwest::Error) -> AuthApiError {
    if e.is_timeout() {
        AuthApiError::Timeout
    } else if e.is_connect() {
        AuthApiError::ServiceUnavailable
    } else {
        AuthApiError::RequestFailed { status: 0, message: e.to_string() }
    }
}

async fn check_status(response: reqwest::Response) -> AuthApiResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = upstream_error_message(&body);
    log_api_error("auth_admin", &message, Some(format!("status {}", status).as_str()));
    Err(AuthApiError::RequestFailed { status, message })
}

/// User service for profile reads and the privileged account actions
#[derive(Clone, Debug)]
pub struct UserService {
    profiles: ProfileRepository,
    admin_api: AuthAdminClient,
}

impl UserService {
    pub fn new(profiles: ProfileRepository, admin_api: AuthAdminClient) -> Self {
        Self { profiles, admin_api }
    }

    /// Caller's own profile
    pub async fn me(&self, ctx: &AuthContext) -> Result<Profile> {
        self.profiles
            .find_by_id(ctx.user_id)
            .await?
            .ok_or(HotelConsoleError::ProfileNotFound { profile_id: ctx.user_id })
    }

    /// Edit the caller's own profile; the role stays as it is
    pub async fn update_me(&self, ctx: &AuthContext, request: UpdateOwnProfileRequest) -> Result<Profile> {
        request.validate()?;
        self.profiles
            .update(ctx.user_id, request.into())
            .await?
            .ok_or(HotelConsoleError::ProfileNotFound { profile_id: ctx.user_id })
    }

    pub async fn list(&self, ctx: &AuthContext, filter: &ProfileFilter, pagination: Pagination) -> Result<Paginated<Profile>> {
        ctx.require_admin()?;
        let (profiles, total) = self.profiles.list(filter, pagination).await?;
        Ok(Paginated::new(profiles, total, pagination))
    }

    pub async fn get(&self, ctx: &AuthContext, id: Uuid) -> Result<Profile> {
        ctx.require_admin()?;
        self.profiles
            .find_by_id(id)
            .await?
            .ok_or(HotelConsoleError::ProfileNotFound { profile_id: id })
    }

    pub async fn update(&self, ctx: &AuthContext, id: Uuid, request: UpdateProfileRequest) -> Result<Profile> {
        ctx.require_admin()?;
        request.validate()?;

        if id == ctx.user_id && request.role.is_some_and(|role| role != ctx.role) {
            return Err(HotelConsoleError::InvalidInput("administrators cannot change their own role".to_string()));
        }

        let role = request.role;
        let profile = self.profiles
            .update(id, request)
            .await?
            .ok_or(HotelConsoleError::ProfileNotFound { profile_id: id })?;

        if let Some(role) = role {
            log_admin_action(ctx.user_id, "set_role", Some(id.to_string().as_str()), Some(role.as_str()));
        }
        Ok(profile)
    }

    /// Create the auth account and its profile
    pub async fn create_user(&self, ctx: &AuthContext, request: CreateUserRequest) -> Result<Profile> {
        ctx.require_admin()?;
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let password = request
            .password
            .clone()
            .unwrap_or_else(|| generate_random_string(GENERATED_PASSWORD_LENGTH));

        let user_id = self.admin_api
            .create_user(&email, &password, request.full_name.trim(), request.role.as_str())
            .await?;

        let new_profile = NewProfile {
            id: user_id,
            email,
            full_name: request.full_name.trim().to_string(),
            phone: request.phone,
            role: request.role,
        };

        let profile = match self.profiles.create(new_profile).await {
            Ok(profile) => profile,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Profile insert failed, removing auth user");
                if let Err(cleanup) = self.admin_api.delete_user(user_id).await {
                    error!(user_id = %user_id, error = %cleanup, "Failed to remove orphaned auth user");
                }
                return Err(e);
            }
        };

        log_admin_action(ctx.user_id, "create_user", Some(profile.id.to_string().as_str()), Some(profile.role.as_str()));
        info!(user_id = %profile.id, role = %profile.role, "User created");
        Ok(profile)
    }

    /// Remove the auth account and its profile
    pub async fn delete_user(&self, ctx: &AuthContext, id: Uuid) -> Result<()> {
        ctx.require_admin()?;

        if id == ctx.user_id {
            return Err(HotelConsoleError::InvalidInput("you cannot delete your own account".to_string()));
        }

        if self.profiles.find_by_id(id).await?.is_none() {
            return Err(HotelConsoleError::ProfileNotFound { profile_id: id });
        }

        self.admin_api.delete_user(id).await?;
        self.profiles.delete(id).await?;

        log_admin_action(ctx.user_id, "delete_user", Some(id.to_string().as_str()), None);
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_shape() {
        let body = AdminCreateUser {
            email: "partner@example.com",
            password: "s3cret-password",
            email_confirm: true,
            user_metadata: UserMetadata { full_name: "Pat Partner", role: "partner" },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["email_confirm"], Value::Bool(true));
        assert_eq!(json["user_metadata"]["role"], "partner");
        assert_eq!(json["user_metadata"]["full_name"], "Pat Partner");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = AuthAdminClient::new(AuthConfig {
            jwt_secret: "x".repeat(32),
            jwt_audience: "authenticated".to_string(),
            api_url: "http://auth.local/auth/v1/".to_string(),
            service_key: "service-key".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(client.endpoint(""), "http://auth.local/auth/v1/admin/users");
        assert_eq!(client.endpoint("/abc"), "http://auth.local/auth/v1/admin/users/abc");
    }
}
