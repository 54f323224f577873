//! Profile model
//!
//! A profile mirrors one user of the hosted auth service and carries the
//! console role that decides which view the user gets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Partner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Partner => "partner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "partner" => Ok(Role::Partner),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Parsed role; unknown values fall back to the least privileged role
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Partner)
    }
}

/// Payload for the privileged "create user" action
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    /// Generated when absent
    #[validate(length(min = 8, max = 72))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub role: Role,
}

/// Row inserted once the auth service has created the user
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Admin edit of any profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub role: Option<Role>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Self-service edit; the role is not editable here
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateOwnProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

impl From<UpdateOwnProfileRequest> for UpdateProfileRequest {
    fn from(request: UpdateOwnProfileRequest) -> Self {
        Self {
            full_name: request.full_name,
            phone: request.phone,
            role: None,
            avatar_url: request.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFilter {
    pub role: Option<Role>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_text() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::Partner.to_string(), "partner");
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_create_user_request_validation() {
        let request = CreateUserRequest {
            email: "not-an-email".to_string(),
            password: Some("short".to_string()),
            full_name: String::new(),
            phone: None,
            role: Role::Partner,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("full_name"));
    }
}
