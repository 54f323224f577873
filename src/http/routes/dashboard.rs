//! Dashboard endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::http::extractors::ApiQuery;
use crate::http::AppState;
use crate::middleware::CurrentUser;
use crate::models::{DashboardSummary, HotelOccupancy};
use crate::utils::errors::Result;

#[derive(Debug, Default, Deserialize)]
pub struct OccupancyParams {
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// GET /dashboard
async fn summary(State(state): State<Arc<AppState>>, CurrentUser(ctx): CurrentUser) -> Result<Json<DashboardSummary>> {
    let summary = state.services.dashboard_service.summary(&ctx).await?;
    Ok(Json(summary))
}

/// GET /dashboard/occupancy?date=YYYY-MM-DD
async fn occupancy(
    State(state): State<Arc<AppState>>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(params): ApiQuery<OccupancyParams>,
) -> Result<Json<Vec<HotelOccupancy>>> {
    let rows = state.services.dashboard_service.hotel_occupancy(&ctx, params.date).await?;
    Ok(Json(rows))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(summary))
        .route("/dashboard/occupancy", get(occupancy))
}
