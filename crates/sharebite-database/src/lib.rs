//! # sharebite-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all ShareBite entities.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
