//! Payment repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::payment::{Payment, PaymentStatus, RecordPaymentRequest};
use crate::utils::errors::HotelConsoleError;

#[derive(Clone, Debug)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a payment against a reservation
    pub async fn create(&self, reservation_id: i64, request: RecordPaymentRequest) -> Result<Payment, HotelConsoleError> {
        let status = request.status.unwrap_or(PaymentStatus::Pending);
        let paid_at = match (request.paid_at, status) {
            (Some(at), _) => Some(at),
            (None, PaymentStatus::Completed) => Some(Utc::now()),
            (None, _) => None,
        };

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (reservation_id, amount, method, status, reference, paid_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#
        )
        .bind(reservation_id)
        .bind(request.amount)
        .bind(request.method.as_str())
        .bind(status.as_str())
        .bind(request.reference)
        .bind(paid_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Payments of one reservation, oldest first
    pub async fn list_for_reservation(&self, reservation_id: i64) -> Result<Vec<Payment>, HotelConsoleError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE reservation_id = $1 ORDER BY created_at ASC, id ASC"
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Find payment by ID; with an owner, only payments under that partner's hotels
    pub async fn find_by_id(&self, id: i64, owner: Option<Uuid>) -> Result<Option<Payment>, HotelConsoleError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.* FROM payments p
            JOIN reservations r ON r.id = p.reservation_id
            JOIN hotels h ON h.id = r.hotel_id
            WHERE p.id = $1 AND ($2::uuid IS NULL OR h.owner_id = $2)
            "#
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Set payment status; completing a payment stamps `paid_at` if it was unset
    pub async fn update_status(&self, id: i64, status: PaymentStatus) -> Result<Option<Payment>, HotelConsoleError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = $2,
                paid_at = CASE WHEN $2 = 'completed' THEN COALESCE(paid_at, $3) ELSE paid_at END
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }
}
