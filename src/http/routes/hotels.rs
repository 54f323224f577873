//! Hotel endpoints, including the rooms nested under a hotel

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::http::extractors::{read_image_upload, ApiJson, ApiQuery, Id};
use crate::http::AppState;
use crate::middleware::CurrentUser;
use crate::models::{
    CreateHotelRequest, CreateRoomRequest, Hotel, HotelFilter, Paginated, PaginationParams, Room, RoomFilter,
    UpdateHotelRequest,
};
use crate::utils::errors::Result;

/// GET /hotels
async fn list_hotels(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(page): ApiQuery<PaginationParams>,
    ApiQuery(filter): ApiQuery<HotelFilter>,
) -> Result<Json<Paginated<Hotel>>> {
    let hotels = state.services.hotel_service.list(&ctx, &filter, page.into()).await?;
    Ok(Json(hotels))
}

/// POST /hotels
async fn create_hotel(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiJson(request): ApiJson<CreateHotelRequest>,
) -> Result<(StatusCode, Json<Hotel>)> {
    let hotel = state.services.hotel_service.create(&ctx, request).await?;
    Ok((StatusCode::CREATED, Json(hotel)))
}

/// GET /hotels/{id}
async fn get_hotel(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<Json<Hotel>> {
    let hotel = state.services.hotel_service.get(&ctx, id).await?;
    Ok(Json(hotel))
}

/// PATCH /hotels/{id}
async fn update_hotel(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<UpdateHotelRequest>,
) -> Result<Json<Hotel>> {
    let hotel = state.services.hotel_service.update(&ctx, id, request).await?;
    Ok(Json(hotel))
}

/// DELETE /hotels/{id}
async fn delete_hotel(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<StatusCode> {
    state.services.hotel_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /hotels/{id}/image (multipart field `file`)
async fn upload_hotel_image(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    multipart: Multipart,
) -> Result<Json<Hotel>> {
    let upload = read_image_upload(multipart, state.max_upload_bytes).await?;
    let hotel = state.services.hotel_service.set_image(&ctx, id, upload).await?;
    Ok(Json(hotel))
}

/// GET /hotels/{id}/rooms
async fn list_rooms(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(hotel_id): Id<i64>,
    ApiQuery(page): ApiQuery<PaginationParams>,
    ApiQuery(filter): ApiQuery<RoomFilter>,
) -> Result<Json<Paginated<Room>>> {
    let rooms = state.services.room_service.list(&ctx, hotel_id, &filter, page.into()).await?;
    Ok(Json(rooms))
}

/// POST /hotels/{id}/rooms
async fn create_room(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(hotel_id): Id<i64>,
    ApiJson(request): ApiJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>)> {
    let room = state.services.room_service.create(&ctx, hotel_id, request).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hotels", get(list_hotels).post(create_hotel))
        .route("/hotels/{id}", get(get_hotel).patch(update_hotel).delete(delete_hotel))
        .route("/hotels/{id}/image", post(upload_hotel_image))
        .route("/hotels/{id}/rooms", get(list_rooms).post(create_room))
}
