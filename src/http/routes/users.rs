//! User management endpoints; every handler requires an administrator

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::http::extractors::{ApiJson, ApiQuery, Id};
use crate::http::AppState;
use crate::middleware::CurrentUser;
use crate::models::{CreateUserRequest, Paginated, PaginationParams, Profile, ProfileFilter, UpdateProfileRequest};
use crate::utils::errors::Result;

/// GET /users
async fn list_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(page): ApiQuery<PaginationParams>,
    ApiQuery(filter): ApiQuery<ProfileFilter>,
) -> Result<Json<Paginated<Profile>>> {
    let users = state.services.user_service.list(&ctx, &filter, page.into()).await?;
    Ok(Json(users))
}

/// POST /users
async fn create_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Profile>)> {
    let profile = state.services.user_service.create_user(&ctx, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<Uuid>,
) -> Result<Json<Profile>> {
    let profile = state.services.user_service.get(&ctx, id).await?;
    Ok(Json(profile))
}

/// PATCH /users/{id}
async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<Uuid>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let profile = state.services.user_service.update(&ctx, id, request).await?;
    Ok(Json(profile))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<Uuid>,
) -> Result<StatusCode> {
    state.services.user_service.delete_user(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).patch(update_user).delete(delete_user))
}
