//! Test helpers module
//!
//! Utilities shared by the integration tests: a PostgreSQL test database,
//! mock auth and storage servers, test data builders and an in-process
//! router harness.

#![allow(dead_code)]

pub mod database_helper;
pub mod mock_servers;
pub mod test_context;
pub mod test_data;

pub use database_helper::*;
pub use mock_servers::*;
pub use test_context::*;
pub use test_data::*;
