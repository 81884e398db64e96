//! # sharebite-service
//!
//! Business logic service layer for ShareBite. The reservation engine is
//! the core: it is the only writer of listing quantity and of request
//! records, and it enforces every quantity and ownership invariant.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod analytics;
pub mod context;
pub mod listing;
pub mod notification;
pub mod reservation;

pub use analytics::{AnalyticsService, GlobalAnalytics, UserAnalytics};
pub use context::RequestContext;
pub use listing::ListingService;
pub use notification::NotificationService;
pub use reservation::{CancelOutcome, ClaimOutcome, ReservationEngine};
