//! REST API over a completed projection.
//!
//! Provides four GET endpoints:
//! - `/config` returns the validated projection inputs
//! - `/summary` returns the summary statistics
//! - `/trajectories` returns chart rows with optional year-range filtering
//! - `/trajectories/{scenario}` returns one scenario's full trajectory

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::ProjectionConfig;
use crate::model::summary::SummaryStats;
use crate::model::trajectory::Trajectories;

pub use types::{ErrorResponse, YearRangeQuery};

/// Read-only application state shared across all request handlers.
///
/// Built once after the projection completes and wrapped in `Arc`.
pub struct AppState {
    /// Validated configuration the projection ran with.
    pub config: ProjectionConfig,
    /// The four scenario trajectories.
    pub trajectories: Trajectories,
    /// Summary statistics over `trajectories`.
    pub summary: SummaryStats,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/config", get(handlers::get_config))
        .route("/summary", get(handlers::get_summary))
        .route("/trajectories", get(handlers::get_chart_rows))
        .route("/trajectories/{scenario}", get(handlers::get_trajectory))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server stops with an I/O failure.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
