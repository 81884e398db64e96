//! Read-side analytics rollups.

pub mod service;

pub use service::{AnalyticsService, GlobalAnalytics, UserAnalytics};
