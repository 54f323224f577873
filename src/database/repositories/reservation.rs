//! Reservation repository implementation
//!
//! Reads join the hotel name and room number the console tables display.
//! Writes that change which nights a room is held run in a transaction
//! holding the room row lock, so two bookings cannot claim the same night.

use std::time::Instant;

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::debug;
use uuid::Uuid;
use crate::models::pagination::Pagination;
use crate::models::reservation::{
    DateRange, NewReservation, Reservation, ReservationFilter, ReservationListItem, ReservationStatus,
    UpdateReservationRequest,
};
use crate::utils::errors::HotelConsoleError;
use crate::utils::helpers::ilike_pattern;
use crate::utils::logging::log_database_operation;

const LIST_ITEM_SELECT: &str = r#"
    SELECT r.*, h.name AS hotel_name, rm.room_number
    FROM reservations r
    JOIN hotels h ON h.id = r.hotel_id
    JOIN rooms rm ON rm.id = r.room_id
"#;

#[derive(Clone, Debug)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a reservation, refusing stays that collide with one already holding the room
    pub async fn create(&self, reservation: NewReservation) -> Result<Reservation, HotelConsoleError> {
        let started = Instant::now();
        let result = self.insert_holding_room(reservation).await;
        log_database_operation("insert", "reservations", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn insert_holding_room(&self, reservation: NewReservation) -> Result<Reservation, HotelConsoleError> {
        let mut tx = self.pool.begin().await?;

        lock_room(&mut tx, reservation.room_id).await?;
        if reservation.status.holds_room() {
            ensure_room_free(&mut tx, reservation.room_id, reservation.stay, None).await?;
        }

        let now = Utc::now();
        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (hotel_id, room_id, guest_name, guest_email, guest_phone, check_in, check_out,
                                      guests, total_amount, status, special_requests, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#
        )
        .bind(reservation.hotel_id)
        .bind(reservation.room_id)
        .bind(reservation.guest_name)
        .bind(reservation.guest_email)
        .bind(reservation.guest_phone)
        .bind(reservation.stay.check_in)
        .bind(reservation.stay.check_out)
        .bind(reservation.guests)
        .bind(reservation.total_amount)
        .bind(reservation.status.as_str())
        .bind(reservation.special_requests)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Find reservation by ID within the owner's scope
    pub async fn find_by_id(&self, id: i64, owner: Option<Uuid>) -> Result<Option<ReservationListItem>, HotelConsoleError> {
        let query = format!(
            "{} WHERE r.id = $1 AND ($2::uuid IS NULL OR h.owner_id = $2)",
            LIST_ITEM_SELECT
        );
        let reservation = sqlx::query_as::<_, ReservationListItem>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reservation)
    }

    /// List reservations with filters and pagination, latest check-in first
    pub async fn list(&self, filter: &ReservationFilter, owner: Option<Uuid>, pagination: Pagination) -> Result<(Vec<ReservationListItem>, i64), HotelConsoleError> {
        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM reservations r JOIN hotels h ON h.id = r.hotel_id",
        );
        push_filters(&mut count_query, filter, owner);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut list_query = QueryBuilder::<Postgres>::new(LIST_ITEM_SELECT);
        push_filters(&mut list_query, filter, owner);
        list_query
            .push(" ORDER BY r.check_in DESC, r.id DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let reservations = list_query
            .build_query_as::<ReservationListItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok((reservations, total))
    }

    /// Update reservation; absent fields are left untouched.
    ///
    /// Moving the dates of a reservation that holds its room re-runs the
    /// overlap check against the room's other reservations.
    pub async fn update(&self, id: i64, request: UpdateReservationRequest) -> Result<Option<Reservation>, HotelConsoleError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let stay = DateRange::new(
            request.check_in.unwrap_or(current.check_in),
            request.check_out.unwrap_or(current.check_out),
        );
        if !stay.is_valid() {
            return Err(HotelConsoleError::InvalidInput("check-out must be after check-in".to_string()));
        }

        let holds_room = current.status().map_or(true, |status| status.holds_room());
        if holds_room && stay != current.stay() {
            lock_room(&mut tx, current.room_id).await?;
            ensure_room_free(&mut tx, current.room_id, stay, Some(id)).await?;
        }

        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET guest_name = COALESCE($2, guest_name),
                guest_email = COALESCE($3, guest_email),
                guest_phone = COALESCE($4, guest_phone),
                check_in = $5,
                check_out = $6,
                guests = COALESCE($7, guests),
                total_amount = COALESCE($8, total_amount),
                special_requests = COALESCE($9, special_requests),
                updated_at = $10
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(request.guest_name)
        .bind(request.guest_email)
        .bind(request.guest_phone)
        .bind(stay.check_in)
        .bind(stay.check_out)
        .bind(request.guests)
        .bind(request.total_amount)
        .bind(request.special_requests)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Set reservation status; any status may follow any other.
    ///
    /// Reviving a cancelled reservation re-runs the overlap check, since the
    /// room may have been booked for those nights in the meantime.
    pub async fn update_status(&self, id: i64, status: ReservationStatus) -> Result<Option<Reservation>, HotelConsoleError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let held_before = current.status().map_or(true, |s| s.holds_room());
        if status.holds_room() && !held_before {
            lock_room(&mut tx, current.room_id).await?;
            ensure_room_free(&mut tx, current.room_id, current.stay(), Some(id)).await?;
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *"
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(reservation))
    }

    /// Delete reservation together with its payments and notes
    pub async fn delete(&self, id: i64) -> Result<bool, HotelConsoleError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn lock_room(tx: &mut Transaction<'_, Postgres>, room_id: i64) -> Result<(), HotelConsoleError> {
    let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
        .bind(room_id)
        .fetch_optional(&mut **tx)
        .await?;

    match locked {
        Some(_) => Ok(()),
        None => Err(HotelConsoleError::RoomNotFound { room_id }),
    }
}

async fn ensure_room_free(
    tx: &mut Transaction<'_, Postgres>,
    room_id: i64,
    stay: DateRange,
    exclude: Option<i64>,
) -> Result<(), HotelConsoleError> {
    let clashing: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id FROM reservations
        WHERE room_id = $1
          AND status <> 'cancelled'
          AND check_in < $3
          AND check_out > $2
          AND ($4::bigint IS NULL OR id <> $4)
        LIMIT 1
        "#
    )
    .bind(room_id)
    .bind(stay.check_in)
    .bind(stay.check_out)
    .bind(exclude)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(other) = clashing {
        debug!(room_id, other_reservation = other, "Room already held for requested dates");
        return Err(HotelConsoleError::Conflict(format!(
            "room is already reserved between {} and {}",
            stay.check_in, stay.check_out
        )));
    }

    Ok(())
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ReservationFilter, owner: Option<Uuid>) {
    query.push(" WHERE TRUE");

    if let Some(owner_id) = owner {
        query.push(" AND h.owner_id = ").push_bind(owner_id);
    }

    if let Some(pattern) = filter.search.as_deref().and_then(ilike_pattern) {
        query
            .push(" AND (r.guest_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR r.guest_email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR r.guest_phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(status) = filter.status {
        query.push(" AND r.status = ").push_bind(status.as_str());
    }

    if let Some(hotel_id) = filter.hotel_id {
        query.push(" AND r.hotel_id = ").push_bind(hotel_id);
    }

    if let Some(room_id) = filter.room_id {
        query.push(" AND r.room_id = ").push_bind(room_id);
    }

    // stays overlapping [from, to)
    if let Some(from) = filter.from {
        query.push(" AND r.check_out > ").push_bind(from);
    }

    if let Some(to) = filter.to {
        query.push(" AND r.check_in < ").push_bind(to);
    }
}
