//! Route handlers organized by resource

pub mod dashboard;
pub mod health;
pub mod hotels;
pub mod payments;
pub mod profile;
pub mod reservations;
pub mod rooms;
pub mod users;
