//! Room model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Single,
    Double,
    Twin,
    Suite,
    Family,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "single",
            RoomType::Double => "double",
            RoomType::Twin => "twin",
            RoomType::Suite => "suite",
            RoomType::Family => "family",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(RoomStatus::Available),
            "occupied" => Ok(RoomStatus::Occupied),
            "maintenance" => Ok(RoomStatus::Maintenance),
            other => Err(format!("unknown room status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: i64,
    pub hotel_id: i64,
    pub room_number: String,
    pub room_type: String,
    pub capacity: i32,
    pub price_per_night: f64,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 20))]
    pub room_number: String,
    pub room_type: RoomType,
    #[validate(range(min = 1, max = 20))]
    pub capacity: i32,
    #[validate(range(min = 0.0, max = 100000.0))]
    pub price_per_night: f64,
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 20))]
    pub room_number: Option<String>,
    pub room_type: Option<RoomType>,
    #[validate(range(min = 1, max = 20))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0.0, max = 100000.0))]
    pub price_per_night: Option<f64>,
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoomStatusRequest {
    pub status: RoomStatus,
}

/// List filters for the rooms of one hotel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    pub status: Option<RoomStatus>,
    pub room_type: Option<RoomType>,
    /// Matches the room number
    pub search: Option<String>,
}
