//! Core traits defined in `sharebite-core` and implemented by other crates.

pub mod store;

pub use store::{ListingStore, NotificationSink, RequestStore};
