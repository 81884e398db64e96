//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sharebite_auth::IdentityVerifier;
use sharebite_core::config::AppConfig;
use sharebite_database::DatabasePool;
use sharebite_service::{
    AnalyticsService, ListingService, NotificationService, ReservationEngine,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db: DatabasePool,
    /// Bearer token verifier.
    pub verifier: Arc<IdentityVerifier>,
    /// The reservation engine for claims, cancellations, and status.
    pub reservations: Arc<ReservationEngine>,
    /// Listing CRUD and browse service.
    pub listing_service: Arc<ListingService>,
    /// Notification inbox service.
    pub notification_service: Arc<NotificationService>,
    /// Analytics service.
    pub analytics_service: Arc<AnalyticsService>,
}
