//! Payment endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::put;
use axum::{Json, Router};

use crate::http::extractors::{ApiJson, Id};
use crate::http::AppState;
use crate::middleware::CurrentUser;
use crate::models::{Payment, UpdatePaymentStatusRequest};
use crate::utils::errors::Result;

/// PUT /payments/{id}/status
async fn set_payment_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    Id(id): Id<i64>,
    ApiJson(request): ApiJson<UpdatePaymentStatusRequest>,
) -> Result<Json<Payment>> {
    let payment = state
        .services
        .reservation_service
        .update_payment_status(&ctx, id, request.status)
        .await?;
    Ok(Json(payment))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/payments/{id}/status", put(set_payment_status))
}
