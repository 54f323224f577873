//! Database repositories module
//!
//! One repository per table, plus the aggregate queries behind the dashboard

pub mod dashboard;
pub mod hotel;
pub mod note;
pub mod payment;
pub mod profile;
pub mod reservation;
pub mod room;

// Re-export repositories
pub use dashboard::{DashboardCounts, DashboardRepository, RevenueTotals};
pub use hotel::HotelRepository;
pub use note::NoteRepository;
pub use payment::PaymentRepository;
pub use profile::ProfileRepository;
pub use reservation::ReservationRepository;
pub use room::RoomRepository;
