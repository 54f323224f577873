//! Hotel repository implementation
//!
//! Every read and write takes an optional owner; when present the statement
//! only touches hotels belonging to that partner.

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use crate::models::hotel::{CreateHotelRequest, Hotel, HotelFilter, UpdateHotelRequest};
use crate::models::pagination::Pagination;
use crate::utils::errors::HotelConsoleError;
use crate::utils::helpers::ilike_pattern;

#[derive(Clone, Debug)]
pub struct HotelRepository {
    pool: PgPool,
}

impl HotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new hotel owned by `owner_id`
    pub async fn create(&self, request: CreateHotelRequest, owner_id: Option<Uuid>) -> Result<Hotel, HotelConsoleError> {
        let now = Utc::now();
        let hotel = sqlx::query_as::<_, Hotel>(
            r#"
            INSERT INTO hotels (owner_id, name, description, address, city, country, star_rating, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#
        )
        .bind(owner_id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.address)
        .bind(request.city)
        .bind(request.country)
        .bind(request.star_rating.unwrap_or(3))
        .bind(request.is_active.unwrap_or(true))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(hotel)
    }

    /// Find hotel by ID within the owner's scope
    pub async fn find_by_id(&self, id: i64, owner: Option<Uuid>) -> Result<Option<Hotel>, HotelConsoleError> {
        let hotel = sqlx::query_as::<_, Hotel>(
            "SELECT * FROM hotels WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)"
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hotel)
    }

    /// List hotels with filters and pagination, ordered by name
    pub async fn list(&self, filter: &HotelFilter, owner: Option<Uuid>, pagination: Pagination) -> Result<(Vec<Hotel>, i64), HotelConsoleError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM hotels");
        push_filters(&mut count_query, filter, owner);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut list_query = QueryBuilder::<Postgres>::new("SELECT * FROM hotels");
        push_filters(&mut list_query, filter, owner);
        list_query
            .push(" ORDER BY name ASC, id ASC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let hotels = list_query
            .build_query_as::<Hotel>()
            .fetch_all(&self.pool)
            .await?;

        Ok((hotels, total))
    }

    /// Update hotel; absent fields are left untouched
    pub async fn update(&self, id: i64, request: UpdateHotelRequest, owner: Option<Uuid>) -> Result<Option<Hotel>, HotelConsoleError> {
        let hotel = sqlx::query_as::<_, Hotel>(
            r#"
            UPDATE hotels
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                address = COALESCE($5, address),
                city = COALESCE($6, city),
                country = COALESCE($7, country),
                star_rating = COALESCE($8, star_rating),
                owner_id = COALESCE($9, owner_id),
                is_active = COALESCE($10, is_active),
                updated_at = $11
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            RETURNING *
            "#
        )
        .bind(id)
        .bind(owner)
        .bind(request.name)
        .bind(request.description)
        .bind(request.address)
        .bind(request.city)
        .bind(request.country)
        .bind(request.star_rating)
        .bind(request.owner_id)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(hotel)
    }

    /// Point the hotel at a newly uploaded image
    pub async fn set_image(&self, id: i64, image_url: &str, owner: Option<Uuid>) -> Result<Option<Hotel>, HotelConsoleError> {
        let hotel = sqlx::query_as::<_, Hotel>(
            r#"
            UPDATE hotels
            SET image_url = $3, updated_at = $4
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            RETURNING *
            "#
        )
        .bind(id)
        .bind(owner)
        .bind(image_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(hotel)
    }

    /// Delete hotel together with its rooms and reservations
    pub async fn delete(&self, id: i64) -> Result<bool, HotelConsoleError> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &HotelFilter, owner: Option<Uuid>) {
    query.push(" WHERE TRUE");

    // a partner's own scope always wins over a requested owner filter
    if let Some(owner_id) = owner.or(filter.owner_id) {
        query.push(" AND owner_id = ").push_bind(owner_id);
    }

    if let Some(pattern) = filter.search.as_deref().and_then(ilike_pattern) {
        query
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(city) = filter.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        query.push(" AND LOWER(city) = LOWER(").push_bind(city.to_string()).push(")");
    }

    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ").push_bind(is_active);
    }
}
