//! Voting front end.
//!
//! Serves a single page with two options, attributes each ballot to a
//! per-browser `voter_id` cookie, and appends the ballot to a Redis list for
//! downstream consumers. Tallying, deduplication, and durability all live on
//! the queue side, not here.
//!
//!
//!
//! # Configuration
//!
//! All settings come from the environment with logged defaults:
//!
//! - `OPTION_A` / `OPTION_B` — displayed option labels (`Cats` / `Dogs`)
//! - `REDIS_URL` — queue address (`redis://redis:6379`)
//! - `PORT` — listen port (`8080`)
//!
//! The host identifier shown on the page is read from the OS at startup.
//!
//!
//!
//! # Endpoints
//!
//! - `GET /` — voting page, sets the `voter_id` cookie
//! - `POST /` — accepts the `vote` form field, best-effort queue append
//! - `GET /metrics` — Prometheus exposition
//!
//! A queue outage is never fatal: the request degrades to a read-only page
//! view and the failure shows up in `queue_connect_failures_total` or
//! `vote_queue_failures_total`.

use std::sync::Arc;

use axum::{Router, routing::get};
use metrics_exporter_prometheus::PrometheusBuilder;
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod page;
pub mod routes;
pub mod state;

use routes::{index_handler, vote_handler};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler).post(vote_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install metrics recorder");

    info!("Starting server...");

    let app = app(state.clone()).route(
        "/metrics",
        get(move || {
            let prometheus = prometheus.clone();
            async move { prometheus.render() }
        }),
    );

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
