//! Reservation note model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReservationNote {
    pub id: i64,
    pub reservation_id: i64,
    pub author_id: Option<Uuid>,
    /// Joined from the author's profile; absent once the author is deleted
    pub author_name: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}
