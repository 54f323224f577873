//! Reservation note repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::note::ReservationNote;
use crate::utils::errors::HotelConsoleError;

#[derive(Clone, Debug)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a note and return it with the author's name
    pub async fn create(&self, reservation_id: i64, author_id: Uuid, body: &str) -> Result<ReservationNote, HotelConsoleError> {
        let note = sqlx::query_as::<_, ReservationNote>(
            r#"
            WITH inserted AS (
                INSERT INTO reservation_notes (reservation_id, author_id, body, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT n.id, n.reservation_id, n.author_id, p.full_name AS author_name, n.body, n.created_at
            FROM inserted n
            LEFT JOIN profiles p ON p.id = n.author_id
            "#
        )
        .bind(reservation_id)
        .bind(author_id)
        .bind(body.trim())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    /// Notes of one reservation, newest first
    pub async fn list_for_reservation(&self, reservation_id: i64) -> Result<Vec<ReservationNote>, HotelConsoleError> {
        let notes = sqlx::query_as::<_, ReservationNote>(
            r#"
            SELECT n.id, n.reservation_id, n.author_id, p.full_name AS author_name, n.body, n.created_at
            FROM reservation_notes n
            LEFT JOIN profiles p ON p.id = n.author_id
            WHERE n.reservation_id = $1
            ORDER BY n.created_at DESC, n.id DESC
            "#
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }
}
