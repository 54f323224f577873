//! Axum server setup
//!
//! Router assembly with CORS, request tracing, per-caller rate limiting and
//! graceful shutdown on SIGTERM/Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::routes;
use crate::config::{ServerConfig, Settings};
use crate::middleware::{log_requests, rate_limit, RequestRateLimiter};
use crate::services::ServiceFactory;
use crate::utils::errors::{HotelConsoleError, Result};

/// Room left in a request body for multipart framing around the image
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
pub struct AppState {
    pub services: ServiceFactory,
    /// `None` when rate limiting is switched off
    pub rate_limiter: Option<RequestRateLimiter>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(settings: &Settings, services: ServiceFactory) -> Self {
        let rate_limiter = settings
            .features
            .rate_limit
            .then(|| RequestRateLimiter::new(&settings.rate_limit));

        Self {
            services,
            rate_limiter,
            max_upload_bytes: settings.storage.max_upload_bytes,
        }
    }
}

/// Build the complete API router
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Result<Router> {
    let cors = cors_layer(config)?;
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    let api = Router::new()
        .merge(routes::profile::router())
        .merge(routes::dashboard::router())
        .merge(routes::hotels::router())
        .merge(routes::rooms::router())
        .merge(routes::reservations::router())
        .merge(routes::payments::router())
        .merge(routes::users::router())
        .route_layer(from_fn_with_state(state.clone(), rate_limit));

    let app = Router::new()
        .merge(routes::health::router())
        .merge(api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(log_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    if config.cors_permissive {
        warn!("CORS: Permissive mode enabled - all origins allowed");
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| HotelConsoleError::Config(format!("Invalid allowed origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn serve(settings: &Settings, services: ServiceFactory) -> Result<()> {
    let addr: SocketAddr = settings
        .server
        .bind_addr
        .parse()
        .map_err(|_| HotelConsoleError::Config(format!("Invalid bind address: {}", settings.server.bind_addr)))?;

    let state = Arc::new(AppState::new(settings, services));
    let app = build_router(state, &settings.server)?;

    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting shutdown");
        }
    }
}
