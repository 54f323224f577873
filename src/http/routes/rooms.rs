//! Room endpoints

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::http::extractors::{read_image_upload, ApiJson, Id};
use crate::http::AppState;
use crate::middleware::CurrentUser;
use crate::models::{Room, UpdateRoomRequest, UpdateRoomStatusRequest};
use crate::utils::errors::Result;

/// GET /rooms/{id}
async fn get_room(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<Json<Room>> {
    let room = state.services.room_service.get(&ctx, id).await?;
    Ok(Json(room))
}

/// PATCH /rooms/{id}
async fn update_room(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<UpdateRoomRequest>,
) -> Result<Json<Room>> {
    let room = state.services.room_service.update(&ctx, id, request).await?;
    Ok(Json(room))
}

/// DELETE /rooms/{id}
async fn delete_room(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<StatusCode> {
    state.services.room_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /rooms/{id}/status
async fn set_room_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<UpdateRoomStatusRequest>,
) -> Result<Json<Room>> {
    let room = state.services.room_service.set_status(&ctx, id, request.status).await?;
    Ok(Json(room))
}

/// POST /rooms/{id}/image (multipart field `file`)
async fn upload_room_image(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    multipart: Multipart,
) -> Result<Json<Room>> {
    let upload = read_image_upload(multipart, state.max_upload_bytes).await?;
    let room = state.services.room_service.set_image(&ctx, id, upload).await?;
    Ok(Json(room))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms/{id}", get(get_room).patch(update_room).delete(delete_room))
        .route("/rooms/{id}/status", put(set_room_status))
        .route("/rooms/{id}/image", post(upload_room_image))
}
