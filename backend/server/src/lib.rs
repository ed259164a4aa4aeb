//! HTTP API of the restaurant recommendation browser.
//!
//!
//!
//! # Routes
//! - `GET /api/health`
//! - `GET /api/restaurants` returns the stored upload as-is
//! - `POST /api/restaurants/upload` replaces it (admin token when configured)
//! - `POST /api/restaurants/browse` groups, filters and returns facets in one call
//! - `POST /api/restaurants/filter` applies one filter change and reports the cascade
//! - `POST /api/address/lookup`, `GET /api/address/cache`
//! - `POST /api/support`, `GET /api/support?filter=unread`, `DELETE /api/support`,
//!   `POST /api/support/{id}/read`, `DELETE /api/support/{id}`
//!
//! Every error answers `{"status": "error", "error": "..."}`.
//!
//!
//!
//! # Configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `RUST_PORT` | `3001` |
//! | `DATA_DIR` | `data` |
//! | `SAMPLE_CSV` | `sample-restaurants.csv` |
//! | `ADMIN_UPLOAD_TOKEN` | unset, uploads are open |
//! | `GOOGLE_PLACES_API_KEY` | unset, lookups answer `no_api_key` |
//!
//! The two secrets are read from `/run/secrets/<NAME>` first.
//!
//!
//!
//! # Setup
//!
//! Run locally with logs.
//! ```sh
//! RUST_LOG=info cargo run -p server
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{delete, get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod places;
pub mod routes;
pub mod state;

use config::Config;
use routes::{
    address_cache_handler, address_lookup_handler, browse_handler, clear_support_handler,
    delete_support_handler,
    filter_handler, health_handler, list_support_handler, mark_read_handler,
    restaurants_handler, submit_support_handler, upload_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/restaurants", get(restaurants_handler))
        .route("/api/restaurants/upload", post(upload_handler))
        .route("/api/restaurants/browse", post(browse_handler))
        .route("/api/restaurants/filter", post(filter_handler))
        .route("/api/address/lookup", post(address_lookup_handler))
        .route("/api/address/cache", get(address_cache_handler))
        .route(
            "/api/support",
            post(submit_support_handler)
                .get(list_support_handler)
                .delete(clear_support_handler),
        )
        .route("/api/support/{id}/read", post(mark_read_handler))
        .route("/api/support/{id}", delete(delete_support_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config)?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
