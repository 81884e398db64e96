//! Listing domain entities.

pub mod model;
pub mod status;

pub use model::{CreateListing, Listing, UpdateListing};
pub use status::ListingStatus;
