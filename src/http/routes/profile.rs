//! The caller's own profile

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::http::extractors::ApiJson;
use crate::http::AppState;
use crate::middleware::CurrentUser;
use crate::models::{Profile, UpdateOwnProfileRequest};
use crate::utils::errors::Result;

/// GET /me
async fn me(State(state): State<Arc<AppState>>, CurrentUser(ctx): CurrentUser) -> Result<Json<Profile>> {
    let profile = state.services.user_service.me(&ctx).await?;
    Ok(Json(profile))
}

/// PATCH /me
async fn update_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiJson(request): ApiJson<UpdateOwnProfileRequest>,
) -> Result<Json<Profile>> {
    let profile = state.services.user_service.update_me(&ctx, request).await?;
    Ok(Json(profile))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(me).patch(update_me))
}
