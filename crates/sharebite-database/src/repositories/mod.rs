//! Concrete sqlx repository implementations.

pub mod listing;
pub mod notification;
pub mod request;

pub use listing::ListingRepository;
pub use notification::NotificationRepository;
pub use request::RequestRepository;
