//! Reservation endpoints with their notes and payments

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::http::extractors::{ApiJson, ApiQuery, Id};
use crate::http::AppState;
use crate::middleware::CurrentUser;
use crate::models::{
    CreateNoteRequest, CreateReservationRequest, Paginated, PaginationParams, Payment, RecordPaymentRequest,
    Reservation, ReservationDetail, ReservationFilter, ReservationNote, ReservationView, UpdateReservationRequest,
    UpdateReservationStatusRequest,
};
use crate::utils::errors::Result;

/// GET /reservations
async fn list_reservations(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(page): ApiQuery<PaginationParams>,
    ApiQuery(filter): ApiQuery<ReservationFilter>,
) -> Result<Json<Paginated<ReservationView>>> {
    let reservations = state.services.reservation_service.list(&ctx, &filter, page.into()).await?;
    Ok(Json(reservations))
}

/// POST /reservations
async fn create_reservation(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiJson(request): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>)> {
    let reservation = state.services.reservation_service.create(&ctx, request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /reservations/{id}
async fn get_reservation(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<Json<ReservationDetail>> {
    let detail = state.services.reservation_service.get(&ctx, id).await?;
    Ok(Json(detail))
}

/// PATCH /reservations/{id}
async fn update_reservation(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<UpdateReservationRequest>,
) -> Result<Json<Reservation>> {
    let reservation = state.services.reservation_service.update(&ctx, id, request).await?;
    Ok(Json(reservation))
}

/// DELETE /reservations/{id}
async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<StatusCode> {
    state.services.reservation_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /reservations/{id}/status
async fn set_reservation_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<UpdateReservationStatusRequest>,
) -> Result<Json<Reservation>> {
    let reservation = state.services.reservation_service.update_status(&ctx, id, request.status).await?;
    Ok(Json(reservation))
}

/// GET /reservations/{id}/notes
async fn list_notes(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<Json<Vec<ReservationNote>>> {
    let notes = state.services.reservation_service.list_notes(&ctx, id).await?;
    Ok(Json(notes))
}

/// POST /reservations/{id}/notes
async fn add_note(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<ReservationNote>)> {
    let note = state.services.reservation_service.add_note(&ctx, id, request).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /reservations/{id}/payments
async fn list_payments(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
) -> Result<Json<Vec<Payment>>> {
    let payments = state.services.reservation_service.list_payments(&ctx, id).await?;
    Ok(Json(payments))
}

/// POST /reservations/{id}/payments
async fn record_payment(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>)> {
    let payment = state.services.reservation_service.record_payment(&ctx, id, request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route(
            "/reservations/{id}",
            get(get_reservation).patch(update_reservation).delete(delete_reservation),
        )
        .route("/reservations/{id}/status", put(set_reservation_status))
        .route("/reservations/{id}/notes", get(list_notes).post(add_note))
        .route("/reservations/{id}/payments", get(list_payments).post(record_payment))
}
