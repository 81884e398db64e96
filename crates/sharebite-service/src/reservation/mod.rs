//! The inventory reservation and request-lifecycle subsystem.

pub mod engine;

pub use engine::{CancelOutcome, ClaimOutcome, ReservationEngine};
