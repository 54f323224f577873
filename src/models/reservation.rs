//! Reservation model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::journey::Journey;
use super::note::ReservationNote;
use super::payment::{Payment, PaymentSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::CheckedIn,
        ReservationStatus::CheckedOut,
        ReservationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::CheckedIn => "checked_in",
            ReservationStatus::CheckedOut => "checked_out",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the reservation still holds its room
    pub fn holds_room(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReservationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown reservation status: {}", s))
    }
}

/// Half-open stay interval `[check_in, check_out)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self { check_in, check_out }
    }

    /// Whole nights between check-in and check-out, never negative
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(0)
    }

    pub fn is_valid(&self) -> bool {
        self.check_out > self.check_in
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub hotel_id: i64,
    pub room_id: i64,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_amount: f64,
    pub status: String,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn stay(&self) -> DateRange {
        DateRange::new(self.check_in, self.check_out)
    }

    pub fn nights(&self) -> i64 {
        self.stay().nights()
    }

    pub fn status(&self) -> Option<ReservationStatus> {
        self.status.parse().ok()
    }
}

/// Reservation joined with the labels the tables display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReservationListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub reservation: Reservation,
    pub hotel_name: String,
    pub room_number: String,
}

/// List row as served to the console, with derived values
#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    #[serde(flatten)]
    pub item: ReservationListItem,
    pub nights: i64,
}

impl From<ReservationListItem> for ReservationView {
    fn from(item: ReservationListItem) -> Self {
        let nights = item.reservation.nights();
        Self { item, nights }
    }
}

/// Everything the reservation detail screen shows
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub view: ReservationView,
    pub journey: Journey,
    pub payments: Vec<Payment>,
    pub payment_summary: PaymentSummary,
    pub notes: Vec<ReservationNote>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReservationRequest {
    /// When given it must match the room's hotel
    pub hotel_id: Option<i64>,
    pub room_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub guest_name: String,
    #[validate(email)]
    pub guest_email: String,
    #[validate(length(max = 50))]
    pub guest_phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 20))]
    pub guests: i32,
    /// Computed from the room price when absent
    #[validate(range(min = 0.0))]
    pub total_amount: Option<f64>,
    pub status: Option<ReservationStatus>,
    #[validate(length(max = 2000))]
    pub special_requests: Option<String>,
}

/// Fully resolved reservation ready to insert
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub hotel_id: i64,
    pub room_id: i64,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub stay: DateRange,
    pub guests: i32,
    pub total_amount: f64,
    pub status: ReservationStatus,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateReservationRequest {
    #[validate(length(min = 1, max = 255))]
    pub guest_name: Option<String>,
    #[validate(email)]
    pub guest_email: Option<String>,
    #[validate(length(max = 50))]
    pub guest_phone: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[validate(range(min = 1, max = 20))]
    pub guests: Option<i32>,
    #[validate(range(min = 0.0))]
    pub total_amount: Option<f64>,
    #[validate(length(max = 2000))]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
}

/// List filters for reservations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    /// Matches guest name, email or phone
    pub search: Option<String>,
    pub status: Option<ReservationStatus>,
    pub hotel_id: Option<i64>,
    pub room_id: Option<i64>,
    /// Stays overlapping `[from, to)`; either bound may be open
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
