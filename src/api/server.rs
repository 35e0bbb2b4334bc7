use std::net::SocketAddr;
use std::path::Path;
use std::time::Instant;

use axum::extract::State;
use axum::{response::IntoResponse, routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::types::StatusDto;
use crate::collectors::poller::FlightStore;

#[derive(Clone)]
pub struct AppState {
    pub store: FlightStore,
    pub started_at: Instant,
    pub provider: &'static str,
}

impl AppState {
    pub fn new(store: FlightStore, provider: &'static str) -> Self {
        Self {
            store,
            started_at: Instant::now(),
            provider,
        }
    }
}

/// API routes plus the dashboard served from `static_dir`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/flights", get(list_flights))
        .route("/api/status", get(status))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

pub async fn run_server(state: AppState, addr: SocketAddr, static_dir: &Path) -> std::io::Result<()> {
    let app = router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Flight tracker listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn list_flights(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    Json(snapshot.flights.clone())
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    Json(StatusDto {
        status: "ok",
        uptime_seconds: state.started_at.elapsed().as_secs(),
        last_update_timestamp: snapshot.updated_at.map(|t| t.timestamp_millis()),
        flight_count: snapshot.flights.len(),
        provider: state.provider,
    })
}
