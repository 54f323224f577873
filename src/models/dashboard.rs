//! Dashboard view models
//!
//! Summaries computed from aggregate query results for the console's
//! landing page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::helpers::{percentage, round_to};

/// Count of rows sharing one status value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyStats {
    pub date: NaiveDate,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub percent: f64,
}

impl OccupancyStats {
    pub fn new(date: NaiveDate, total_rooms: i64, occupied_rooms: i64) -> Self {
        Self {
            date,
            total_rooms,
            occupied_rooms,
            percent: percentage(occupied_rooms, total_rooms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueStats {
    /// Sum of completed payments
    pub collected: f64,
    /// Sum of refunded payments
    pub refunded: f64,
    /// Sum of reservation totals, cancelled reservations excluded
    pub booked: f64,
    /// Booked value not yet collected
    pub outstanding: f64,
}

impl RevenueStats {
    pub fn new(collected: f64, refunded: f64, booked: f64) -> Self {
        Self {
            collected: round_to(collected, 2),
            refunded: round_to(refunded, 2),
            booked: round_to(booked, 2),
            outstanding: round_to((booked - collected).max(0.0), 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub hotels: i64,
    pub rooms: i64,
    pub rooms_by_status: Vec<StatusCount>,
    pub reservations: i64,
    pub reservations_by_status: Vec<StatusCount>,
    pub arrivals_today: i64,
    pub departures_today: i64,
    pub occupancy: OccupancyStats,
    pub revenue: RevenueStats,
}

/// Aggregate row for one hotel's occupancy on a date
#[derive(Debug, Clone, FromRow)]
pub struct HotelOccupancyRow {
    pub hotel_id: i64,
    pub hotel_name: String,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOccupancy {
    pub hotel_id: i64,
    pub hotel_name: String,
    #[serde(flatten)]
    pub occupancy: OccupancyStats,
}

impl HotelOccupancy {
    pub fn from_row(row: HotelOccupancyRow, date: NaiveDate) -> Self {
        Self {
            hotel_id: row.hotel_id,
            hotel_name: row.hotel_name,
            occupancy: OccupancyStats::new(date, row.total_rooms, row.occupied_rooms),
        }
    }
}
