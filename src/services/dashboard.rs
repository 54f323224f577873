//! Dashboard service
//!
//! Builds the landing page summary from aggregate queries. Summaries may be
//! cached in Redis per scope and date; a failing cache is logged and skipped.

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};
use crate::database::DashboardRepository;
use crate::models::{DashboardSummary, HotelOccupancy, OccupancyStats, RevenueStats};
use crate::services::auth::AuthContext;
use crate::services::redis::RedisService;
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct DashboardService {
    dashboard: DashboardRepository,
    cache: Option<RedisService>,
}

impl DashboardService {
    pub fn new(dashboard: DashboardRepository, cache: Option<RedisService>) -> Self {
        Self { dashboard, cache }
    }

    /// Cache key for one caller scope on one date
    pub fn cache_key(ctx: &AuthContext, date: NaiveDate) -> String {
        match ctx.owner_scope() {
            None => format!("summary:all:{}", date),
            Some(owner) => format!("summary:owner:{}:{}", owner, date),
        }
    }

    pub async fn summary(&self, ctx: &AuthContext) -> Result<DashboardSummary> {
        let date = Utc::now().date_naive();
        let key = Self::cache_key(ctx, date);

        if let Some(cache) = &self.cache {
            match cache.get::<DashboardSummary>(&key).await {
                Ok(Some(summary)) => return Ok(summary),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Summary cache unavailable, querying database"),
            }
        }

        let summary = self.build_summary(ctx, date).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&key, &summary, None).await {
                warn!(error = %e, "Failed to cache summary");
            }
        }

        Ok(summary)
    }

    async fn build_summary(&self, ctx: &AuthContext, date: NaiveDate) -> Result<DashboardSummary> {
        let owner = ctx.owner_scope();
        let (counts, rooms_by_status, reservations_by_status, revenue) = futures::try_join!(
            self.dashboard.counts(owner, date),
            self.dashboard.rooms_by_status(owner),
            self.dashboard.reservations_by_status(owner),
            self.dashboard.revenue(owner),
        )?;

        debug!(user_id = %ctx.user_id, hotels = counts.hotels, rooms = counts.rooms, "Summary computed");

        Ok(DashboardSummary {
            date,
            hotels: counts.hotels,
            rooms: counts.rooms,
            rooms_by_status,
            reservations: counts.reservations,
            reservations_by_status,
            arrivals_today: counts.arrivals,
            departures_today: counts.departures,
            occupancy: OccupancyStats::new(date, counts.rooms, counts.occupied_rooms),
            revenue: RevenueStats::new(revenue.collected, revenue.refunded, revenue.booked),
        })
    }

    /// Occupancy of every hotel in scope on `date` (today when absent)
    pub async fn hotel_occupancy(&self, ctx: &AuthContext, date: Option<NaiveDate>) -> Result<Vec<HotelOccupancy>> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let rows = self.dashboard.hotel_occupancy(ctx.owner_scope(), date).await?;

        Ok(rows
            .into_iter()
            .map(|row| HotelOccupancy::from_row(row, date))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use uuid::Uuid;

    #[test]
    fn test_cache_key_separates_scopes() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            full_name: "Admin".to_string(),
            role: Role::Admin,
        };
        let partner = AuthContext { role: Role::Partner, ..admin.clone() };

        assert_eq!(DashboardService::cache_key(&admin, date), "summary:all:2024-08-01");
        assert_eq!(
            DashboardService::cache_key(&partner, date),
            format!("summary:owner:{}:2024-08-01", partner.user_id)
        );
    }
}
