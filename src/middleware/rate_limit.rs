//! Rate limiting middleware
//!
//! Keyed token bucket per caller. Callers with a token that verifies are
//! keyed by its subject; everyone else by the client address the proxy
//! forwards, so made-up tokens never open a fresh bucket.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::RateLimitConfig;
use crate::http::AppState;
use crate::middleware::auth::extract_bearer_token;
use crate::services::TokenVerifier;
use crate::utils::errors::{HotelConsoleError, Result};

/// Tracked keys beyond which idle entries are pruned
const PRUNE_THRESHOLD: usize = 10_000;

/// Shared keyed limiter
#[derive(Clone)]
pub struct RequestRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl RequestRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let mut quota = Quota::per_minute(per_minute);
        if let Some(burst) = NonZeroU32::new(config.burst) {
            quota = quota.allow_burst(burst);
        }

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Take one request from `key`'s bucket
    pub fn check(&self, key: &str) -> Result<()> {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
            debug!(remaining = self.limiter.len(), "Pruned idle rate limit entries");
        }

        self.limiter
            .check_key(&key.to_string())
            .map_err(|_| HotelConsoleError::RateLimitExceeded)
    }
}

/// Who a request is accounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientKey {
    User(Uuid),
    Address(String),
    Anonymous,
}

impl ClientKey {
    pub fn from_headers(headers: &HeaderMap, verifier: &TokenVerifier) -> Self {
        let subject = extract_bearer_token(headers).and_then(|token| verifier.verify(token).ok());
        if let Some(claims) = subject {
            return ClientKey::User(claims.sub);
        }

        forwarded_address(headers)
            .map(ClientKey::Address)
            .unwrap_or(ClientKey::Anonymous)
    }

    fn bucket(&self) -> String {
        match self {
            ClientKey::User(user_id) => format!("user:{}", user_id),
            ClientKey::Address(addr) => format!("addr:{}", addr),
            ClientKey::Anonymous => "anonymous".to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ClientKey::User(_) => "user",
            ClientKey::Address(_) => "address",
            ClientKey::Anonymous => "anonymous",
        }
    }
}

/// First hop of `x-forwarded-for`, else `x-real-ip`
fn forwarded_address(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))?;

    let addr = raw.trim();
    if addr.is_empty() || addr.len() > 64 {
        return None;
    }

    addr.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b':' || b == b'-')
        .then(|| addr.to_string())
}

/// Reject requests over quota with 429; a no-op when limiting is disabled
pub async fn rate_limit(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        let key = ClientKey::from_headers(req.headers(), state.services.auth_service.verifier());
        if let Err(e) = limiter.check(&key.bucket()) {
            warn!(
                client = key.kind(),
                method = %req.method(),
                path = %req.uri().path(),
                "Rate limit exceeded"
            );
            return e.into_response();
        }
    }

    next.run(req).await
}
