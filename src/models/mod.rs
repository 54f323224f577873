//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod dashboard;
pub mod hotel;
pub mod journey;
pub mod note;
pub mod pagination;
pub mod payment;
pub mod profile;
pub mod reservation;
pub mod room;

// Re-export commonly used models
pub use dashboard::{DashboardSummary, HotelOccupancy, HotelOccupancyRow, OccupancyStats, RevenueStats, StatusCount};
pub use hotel::{Hotel, CreateHotelRequest, UpdateHotelRequest, HotelFilter};
pub use journey::{Journey, JourneyStep};
pub use note::{ReservationNote, CreateNoteRequest};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use payment::{Payment, PaymentMethod, PaymentStatus, PaymentSummary, RecordPaymentRequest, UpdatePaymentStatusRequest};
pub use profile::{Profile, Role, CreateUserRequest, NewProfile, UpdateProfileRequest, UpdateOwnProfileRequest, ProfileFilter};
pub use reservation::{Reservation, ReservationStatus, ReservationListItem, ReservationView, ReservationDetail, DateRange, CreateReservationRequest, NewReservation, UpdateReservationRequest, UpdateReservationStatusRequest, ReservationFilter};
pub use room::{Room, RoomStatus, RoomType, CreateRoomRequest, UpdateRoomRequest, UpdateRoomStatusRequest, RoomFilter};
