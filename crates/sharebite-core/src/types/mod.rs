//! Shared value types.

pub mod filter;
pub mod pagination;

pub use filter::{ListingFilter, ListingSort};
pub use pagination::{PageRequest, PageResponse};
