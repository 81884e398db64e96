//! Listing CRUD and browse services.

pub mod service;

pub use service::ListingService;
