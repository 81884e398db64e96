//! ShareBite server: surplus-food sharing backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use sharebite_core::config::AppConfig;
use sharebite_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("SHAREBITE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ShareBite v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db = sharebite_database::DatabasePool::connect(&config.database).await?;
    db.run_migrations().await?;

    // Repositories
    let listing_repo = Arc::new(
        sharebite_database::repositories::ListingRepository::new(db.pool().clone()),
    );
    let request_repo = Arc::new(
        sharebite_database::repositories::RequestRepository::new(db.pool().clone()),
    );
    let notification_repo = Arc::new(
        sharebite_database::repositories::NotificationRepository::new(db.pool().clone()),
    );

    // Identity verification
    let verifier = Arc::new(sharebite_auth::IdentityVerifier::new(&config.auth));

    // Services
    let reservations = Arc::new(sharebite_service::ReservationEngine::new(
        Arc::clone(&listing_repo) as Arc<dyn sharebite_core::traits::ListingStore>,
        Arc::clone(&request_repo) as Arc<dyn sharebite_core::traits::RequestStore>,
        Arc::clone(&notification_repo) as Arc<dyn sharebite_core::traits::NotificationSink>,
    ));
    let listing_service = Arc::new(sharebite_service::ListingService::new(Arc::clone(
        &listing_repo,
    )));
    let notification_service = Arc::new(sharebite_service::NotificationService::new(Arc::clone(
        &notification_repo,
    )));
    let analytics_service = Arc::new(sharebite_service::AnalyticsService::new(
        Arc::clone(&listing_repo),
        Arc::clone(&request_repo),
    ));

    // HTTP server
    let app_state = sharebite_api::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        verifier,
        reservations,
        listing_service,
        notification_service,
        analytics_service,
    };

    let app = sharebite_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ShareBite server listening on {addr}");

    // Graceful shutdown: on signal, stop accepting and give in-flight
    // requests the configured grace period to drain.
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result
                .map_err(|e| AppError::internal(format!("Server task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining connections");
            let _ = shutdown_tx.send(true);
            if tokio::time::timeout(grace, server).await.is_err() {
                tracing::warn!(
                    grace_seconds = config.server.shutdown_grace_seconds,
                    "Connections still open after the grace period, aborting"
                );
            }
        }
    }

    db.close().await;
    tracing::info!("ShareBite server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
