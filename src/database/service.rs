//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    health_check, DashboardRepository, DatabasePool, HotelRepository, NoteRepository, PaymentRepository,
    ProfileRepository, ReservationRepository, RoomRepository,
};
use crate::models::{Payment, ReservationNote};
use crate::utils::errors::HotelConsoleError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub profiles: ProfileRepository,
    pub hotels: HotelRepository,
    pub rooms: RoomRepository,
    pub reservations: ReservationRepository,
    pub payments: PaymentRepository,
    pub notes: NoteRepository,
    pub dashboard: DashboardRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool.clone()),
            hotels: HotelRepository::new(pool.clone()),
            rooms: RoomRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            notes: NoteRepository::new(pool.clone()),
            dashboard: DashboardRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Check that the database answers queries
    pub async fn ping(&self) -> Result<(), HotelConsoleError> {
        health_check(&self.pool).await
    }

    /// Load payments and notes of a reservation concurrently
    pub async fn reservation_activity(&self, reservation_id: i64) -> Result<(Vec<Payment>, Vec<ReservationNote>), HotelConsoleError> {
        futures::try_join!(
            self.payments.list_for_reservation(reservation_id),
            self.notes.list_for_reservation(reservation_id),
        )
    }
}
