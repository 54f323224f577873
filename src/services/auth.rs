//! Authentication service implementation
//!
//! Verifies bearer tokens issued by the hosted auth service and resolves the
//! caller's role from their profile. Administrators act on everything;
//! partners are scoped to the hotels they own.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;
use crate::config::AuthConfig;
use crate::database::ProfileRepository;
use crate::models::{Profile, Role};
use crate::utils::errors::{HotelConsoleError, Result};

/// Permission levels, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    /// Manage own hotels and everything under them
    Partner,
    /// Manage every hotel and all user accounts
    Admin,
}

impl From<Role> for Permission {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Permission::Admin,
            Role::Partner => Permission::Partner,
        }
    }
}

/// Whether holding `held` grants everything `required` does
pub fn permission_includes(held: Permission, required: Permission) -> bool {
    held >= required
}

/// Claims carried by access tokens of the hosted auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// Authentication context for a request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl AuthContext {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            user_id: profile.id,
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            role: profile.role(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn permission(&self) -> Permission {
        Permission::from(self.role)
    }

    /// Require specific permission or return error
    pub fn require(&self, required: Permission) -> Result<()> {
        if permission_includes(self.permission(), required) {
            return Ok(());
        }

        Err(HotelConsoleError::PermissionDenied(format!(
            "{:?} permission required",
            required
        )))
    }

    pub fn require_admin(&self) -> Result<()> {
        self.require(Permission::Admin)
    }

    /// Owner filter applied to catalog queries; `None` means unrestricted
    pub fn owner_scope(&self) -> Option<Uuid> {
        if self.is_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }
}

/// Stateless HS256 token verification
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[config.jwt_audience.as_str()]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => HotelConsoleError::Authentication("token has expired".to_string()),
                ErrorKind::InvalidAudience => HotelConsoleError::Authentication("token audience mismatch".to_string()),
                _ => HotelConsoleError::Token(e),
            }
        })?;

        Ok(data.claims)
    }
}

/// Authentication service turning bearer tokens into request contexts
#[derive(Clone)]
pub struct AuthService {
    verifier: TokenVerifier,
    profiles: ProfileRepository,
}

impl AuthService {
    pub fn new(config: &AuthConfig, profiles: ProfileRepository) -> Self {
        Self {
            verifier: TokenVerifier::new(config),
            profiles,
        }
    }

    /// Signature and expiry checks only, without a profile lookup
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.verifier.verify(token)
    }

    /// Verify the token and load the caller's profile
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let claims = self.verify_token(token)?;

        let profile = self.profiles.find_by_id(claims.sub).await?.ok_or_else(|| {
            warn!(user_id = %claims.sub, "Valid token without a profile");
            HotelConsoleError::Authentication("no profile for this account".to_string())
        })?;

        let context = AuthContext::from_profile(&profile);
        debug!(user_id = %context.user_id, role = %context.role, "Request authenticated");
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "a-test-secret-that-is-long-enough-for-hs256";

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            jwt_audience: "authenticated".to_string(),
            api_url: "http://localhost:9999/auth/v1".to_string(),
            service_key: "service-key".to_string(),
            timeout_seconds: 5,
        }
    }

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: String,
        email: &'a str,
        aud: &'a str,
        exp: u64,
    }

    fn now_epoch() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn token(sub: Uuid, aud: &str, exp: u64, secret: &str) -> String {
        let claims = TestClaims { sub: sub.to_string(), email: "staff@example.com", aud, exp };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "staff@example.com".to_string(),
            full_name: "Staff".to_string(),
            role,
        }
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let verifier = TokenVerifier::new(&auth_config());
        let user_id = Uuid::new_v4();
        let claims = verifier
            .verify(&token(user_id, "authenticated", now_epoch() + 3600, SECRET))
            .unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email.as_deref(), Some("staff@example.com"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = TokenVerifier::new(&auth_config());
        let result = verifier.verify(&token(Uuid::new_v4(), "authenticated", now_epoch() - 3600, SECRET));
        assert_matches!(result, Err(HotelConsoleError::Authentication(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = TokenVerifier::new(&auth_config());
        let result = verifier.verify(&token(
            Uuid::new_v4(),
            "authenticated",
            now_epoch() + 3600,
            "some-other-secret-of-sufficient-length",
        ));
        assert_matches!(result, Err(HotelConsoleError::Token(_)));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let verifier = TokenVerifier::new(&auth_config());
        let result = verifier.verify(&token(Uuid::new_v4(), "anon", now_epoch() + 3600, SECRET));
        assert_matches!(result, Err(HotelConsoleError::Authentication(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let verifier = TokenVerifier::new(&auth_config());
        assert!(verifier.verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_permission_ordering() {
        assert!(permission_includes(Permission::Admin, Permission::Partner));
        assert!(permission_includes(Permission::Partner, Permission::Partner));
        assert!(!permission_includes(Permission::Partner, Permission::Admin));
    }

    #[test]
    fn test_owner_scope_by_role() {
        let admin = context(Role::Admin);
        assert!(admin.is_admin());
        assert_eq!(admin.owner_scope(), None);
        assert!(admin.require_admin().is_ok());

        let partner = context(Role::Partner);
        assert_eq!(partner.owner_scope(), Some(partner.user_id));
        assert_matches!(partner.require_admin(), Err(HotelConsoleError::PermissionDenied(_)));
        assert!(partner.require(Permission::Partner).is_ok());
    }
}
