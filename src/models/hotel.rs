//! Hotel model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hotel {
    pub id: i64,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: String,
    pub country: String,
    pub star_rating: i16,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHotelRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub city: String,
    #[validate(length(min = 1, max = 255))]
    pub country: String,
    #[validate(range(min = 1, max = 5))]
    pub star_rating: Option<i16>,
    /// Only honoured for administrators; partners always own what they create
    pub owner_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateHotelRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub country: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub star_rating: Option<i16>,
    pub owner_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// List filters for hotels
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelFilter {
    /// Matches name or city
    pub search: Option<String>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
    pub owner_id: Option<Uuid>,
}
