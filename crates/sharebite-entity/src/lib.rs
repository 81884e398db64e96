//! # sharebite-entity
//!
//! Domain entity models for ShareBite. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod listing;
pub mod notification;
pub mod request;

use thiserror::Error;

/// Error returned when parsing a status string fails.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ParseStatusError(pub String);
