//! Profile repository implementation

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use crate::models::pagination::Pagination;
use crate::models::profile::{NewProfile, Profile, ProfileFilter, UpdateProfileRequest};
use crate::utils::errors::HotelConsoleError;
use crate::utils::helpers::ilike_pattern;

#[derive(Clone, Debug)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new profile
    pub async fn create(&self, profile: NewProfile) -> Result<Profile, HotelConsoleError> {
        let now = Utc::now();
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name, phone, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#
        )
        .bind(profile.id)
        .bind(profile.email)
        .bind(profile.full_name)
        .bind(profile.phone)
        .bind(profile.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, HotelConsoleError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// List profiles with filters and pagination, newest first
    pub async fn list(&self, filter: &ProfileFilter, pagination: Pagination) -> Result<(Vec<Profile>, i64), HotelConsoleError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM profiles");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut list_query = QueryBuilder::<Postgres>::new("SELECT * FROM profiles");
        push_filters(&mut list_query, filter);
        list_query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let profiles = list_query
            .build_query_as::<Profile>()
            .fetch_all(&self.pool)
            .await?;

        Ok((profiles, total))
    }

    /// Update profile; absent fields are left untouched
    pub async fn update(&self, id: Uuid, request: UpdateProfileRequest) -> Result<Option<Profile>, HotelConsoleError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                role = COALESCE($4, role),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(request.full_name)
        .bind(request.phone)
        .bind(request.role.map(|role| role.as_str()))
        .bind(request.avatar_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Delete profile
    pub async fn delete(&self, id: Uuid) -> Result<bool, HotelConsoleError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ProfileFilter) {
    query.push(" WHERE TRUE");

    if let Some(role) = filter.role {
        query.push(" AND role = ").push_bind(role.as_str());
    }

    if let Some(pattern) = filter.search.as_deref().and_then(ilike_pattern) {
        query
            .push(" AND (email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR full_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}
