//! Aggregate queries behind the dashboard
//!
//! Every query takes an optional owner; partners only count their own hotels.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use crate::models::dashboard::{HotelOccupancyRow, StatusCount};
use crate::utils::errors::HotelConsoleError;

/// Headline counts for one date
#[derive(Debug, Clone, Default, FromRow)]
pub struct DashboardCounts {
    pub hotels: i64,
    pub rooms: i64,
    pub reservations: i64,
    pub arrivals: i64,
    pub departures: i64,
    pub occupied_rooms: i64,
}

/// Money totals across the scope
#[derive(Debug, Clone, Default, FromRow)]
pub struct RevenueTotals {
    pub collected: f64,
    pub refunded: f64,
    pub booked: f64,
}

#[derive(Clone, Debug)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn counts(&self, owner: Option<Uuid>, date: NaiveDate) -> Result<DashboardCounts, HotelConsoleError> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            WITH scoped_hotels AS (
                SELECT id FROM hotels WHERE ($1::uuid IS NULL OR owner_id = $1)
            ),
            scoped_reservations AS (
                SELECT r.* FROM reservations r WHERE r.hotel_id IN (SELECT id FROM scoped_hotels)
            )
            SELECT
                (SELECT COUNT(*) FROM scoped_hotels) AS hotels,
                (SELECT COUNT(*) FROM rooms WHERE hotel_id IN (SELECT id FROM scoped_hotels)) AS rooms,
                (SELECT COUNT(*) FROM scoped_reservations) AS reservations,
                (SELECT COUNT(*) FROM scoped_reservations
                    WHERE check_in = $2 AND status <> 'cancelled') AS arrivals,
                (SELECT COUNT(*) FROM scoped_reservations
                    WHERE check_out = $2 AND status <> 'cancelled') AS departures,
                (SELECT COUNT(DISTINCT room_id) FROM scoped_reservations
                    WHERE status IN ('confirmed', 'checked_in')
                      AND check_in <= $2 AND check_out > $2) AS occupied_rooms
            "#
        )
        .bind(owner)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn rooms_by_status(&self, owner: Option<Uuid>) -> Result<Vec<StatusCount>, HotelConsoleError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT rm.status, COUNT(*) AS count
            FROM rooms rm
            JOIN hotels h ON h.id = rm.hotel_id
            WHERE ($1::uuid IS NULL OR h.owner_id = $1)
            GROUP BY rm.status
            ORDER BY rm.status
            "#
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn reservations_by_status(&self, owner: Option<Uuid>) -> Result<Vec<StatusCount>, HotelConsoleError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT r.status, COUNT(*) AS count
            FROM reservations r
            JOIN hotels h ON h.id = r.hotel_id
            WHERE ($1::uuid IS NULL OR h.owner_id = $1)
            GROUP BY r.status
            ORDER BY r.status
            "#
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn revenue(&self, owner: Option<Uuid>) -> Result<RevenueTotals, HotelConsoleError> {
        let totals = sqlx::query_as::<_, RevenueTotals>(
            r#"
            WITH scoped_reservations AS (
                SELECT r.id, r.total_amount, r.status
                FROM reservations r
                JOIN hotels h ON h.id = r.hotel_id
                WHERE ($1::uuid IS NULL OR h.owner_id = $1)
            )
            SELECT
                COALESCE((SELECT SUM(p.amount) FROM payments p
                    WHERE p.status = 'completed'
                      AND p.reservation_id IN (SELECT id FROM scoped_reservations)), 0)::float8 AS collected,
                COALESCE((SELECT SUM(p.amount) FROM payments p
                    WHERE p.status = 'refunded'
                      AND p.reservation_id IN (SELECT id FROM scoped_reservations)), 0)::float8 AS refunded,
                COALESCE((SELECT SUM(total_amount) FROM scoped_reservations
                    WHERE status <> 'cancelled'), 0)::float8 AS booked
            "#
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Room totals and occupied rooms per hotel on `date`
    pub async fn hotel_occupancy(&self, owner: Option<Uuid>, date: NaiveDate) -> Result<Vec<HotelOccupancyRow>, HotelConsoleError> {
        let rows = sqlx::query_as::<_, HotelOccupancyRow>(
            r#"
            SELECT
                h.id AS hotel_id,
                h.name AS hotel_name,
                (SELECT COUNT(*) FROM rooms rm WHERE rm.hotel_id = h.id) AS total_rooms,
                (SELECT COUNT(DISTINCT r.room_id) FROM reservations r
                    WHERE r.hotel_id = h.id
                      AND r.status IN ('confirmed', 'checked_in')
                      AND r.check_in <= $2 AND r.check_out > $2) AS occupied_rooms
            FROM hotels h
            WHERE ($1::uuid IS NULL OR h.owner_id = $1)
            ORDER BY h.name ASC, h.id ASC
            "#
        )
        .bind(owner)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
