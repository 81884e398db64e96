//! # sharebite-core
//!
//! Core crate for ShareBite. Contains the store traits the reservation
//! engine is written against, configuration schemas, pagination types,
//! and the unified error system.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
