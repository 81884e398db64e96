//! HTTP request handlers, grouped by domain.

pub mod analytics;
pub mod health;
pub mod listing;
pub mod notification;
pub mod reservation;
