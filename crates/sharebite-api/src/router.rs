//! Route definitions for the ShareBite HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(listing_routes())
        .merge(request_routes())
        .merge(notification_routes())
        .merge(analytics_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Listing CRUD, browse, and claims
fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/listings", post(handlers::listing::create_listing))
        .route("/listings", get(handlers::listing::browse_listings))
        .route(
            "/listings/featured",
            get(handlers::listing::featured_listings),
        )
        .route("/listings/mine", get(handlers::listing::my_listings))
        .route("/listings/{id}", get(handlers::listing::get_listing))
        .route("/listings/{id}", put(handlers::listing::update_listing))
        .route("/listings/{id}", delete(handlers::listing::delete_listing))
        .route(
            "/listings/{id}/claims",
            post(handlers::reservation::claim_listing),
        )
        .route(
            "/listings/{id}/requests",
            get(handlers::reservation::requests_for_listing),
        )
}

/// Request lifecycle endpoints
fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/requests/mine", get(handlers::reservation::my_requests))
        .route(
            "/requests/received",
            get(handlers::reservation::received_requests),
        )
        .route(
            "/requests/{id}",
            delete(handlers::reservation::cancel_request),
        )
        .route(
            "/requests/{id}/status",
            put(handlers::reservation::update_request_status),
        )
}

/// Notification inbox endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

/// Analytics endpoints
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/me", get(handlers::analytics::user_analytics))
        .route(
            "/analytics/global",
            get(handlers::analytics::global_analytics),
        )
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
