//! Room repository implementation

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use crate::models::pagination::Pagination;
use crate::models::room::{CreateRoomRequest, Room, RoomFilter, RoomStatus, UpdateRoomRequest};
use crate::utils::errors::HotelConsoleError;
use crate::utils::helpers::ilike_pattern;

#[derive(Clone, Debug)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new room in a hotel
    pub async fn create(&self, hotel_id: i64, request: CreateRoomRequest) -> Result<Room, HotelConsoleError> {
        let now = Utc::now();
        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (hotel_id, room_number, room_type, capacity, price_per_night, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        )
        .bind(hotel_id)
        .bind(request.room_number.trim().to_string())
        .bind(request.room_type.as_str())
        .bind(request.capacity)
        .bind(request.price_per_night)
        .bind(request.status.unwrap_or(RoomStatus::Available).as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    /// Find room by ID; with an owner, only rooms of that partner's hotels
    pub async fn find_by_id(&self, id: i64, owner: Option<Uuid>) -> Result<Option<Room>, HotelConsoleError> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT rm.* FROM rooms rm
            JOIN hotels h ON h.id = rm.hotel_id
            WHERE rm.id = $1 AND ($2::uuid IS NULL OR h.owner_id = $2)
            "#
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// List the rooms of a hotel, ordered by room number
    pub async fn list(&self, hotel_id: i64, filter: &RoomFilter, pagination: Pagination) -> Result<(Vec<Room>, i64), HotelConsoleError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM rooms");
        push_filters(&mut count_query, hotel_id, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut list_query = QueryBuilder::<Postgres>::new("SELECT * FROM rooms");
        push_filters(&mut list_query, hotel_id, filter);
        list_query
            .push(" ORDER BY room_number ASC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rooms = list_query
            .build_query_as::<Room>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rooms, total))
    }

    /// Update room; absent fields are left untouched
    pub async fn update(&self, id: i64, request: UpdateRoomRequest) -> Result<Option<Room>, HotelConsoleError> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms
            SET room_number = COALESCE($2, room_number),
                room_type = COALESCE($3, room_type),
                capacity = COALESCE($4, capacity),
                price_per_night = COALESCE($5, price_per_night),
                status = COALESCE($6, status),
                updated_at = $7
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(request.room_number.map(|n| n.trim().to_string()))
        .bind(request.room_type.map(|t| t.as_str()))
        .bind(request.capacity)
        .bind(request.price_per_night)
        .bind(request.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Set the housekeeping status of a room
    pub async fn set_status(&self, id: i64, status: RoomStatus) -> Result<Option<Room>, HotelConsoleError> {
        let room = sqlx::query_as::<_, Room>(
            "UPDATE rooms SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *"
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Point the room at a newly uploaded image
    pub async fn set_image(&self, id: i64, image_url: &str) -> Result<Option<Room>, HotelConsoleError> {
        let room = sqlx::query_as::<_, Room>(
            "UPDATE rooms SET image_url = $2, updated_at = $3 WHERE id = $1 RETURNING *"
        )
        .bind(id)
        .bind(image_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Delete room
    pub async fn delete(&self, id: i64) -> Result<bool, HotelConsoleError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, hotel_id: i64, filter: &RoomFilter) {
    query.push(" WHERE hotel_id = ").push_bind(hotel_id);

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(room_type) = filter.room_type {
        query.push(" AND room_type = ").push_bind(room_type.as_str());
    }

    if let Some(pattern) = filter.search.as_deref().and_then(ilike_pattern) {
        query.push(" AND room_number ILIKE ").push_bind(pattern);
    }
}
