//! REST API for simulation results.
//!
//! Routes:
//! - `GET /result`: full result of the run the server was started with
//! - `GET /hourly`: hourly records with optional inclusive range filtering
//! - `GET /recommendations`: advisory strings
//! - `POST /simulate`: runs a fresh simulation for the posted parameters

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::error::SimError;
use crate::sim::types::SimulationResult;

pub use types::{ErrorResponse, HourlyQuery};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the startup run completes and wrapped in `Arc`.
/// `POST /simulate` computes its own result and leaves this untouched.
pub struct AppState {
    /// Result of the startup run.
    pub result: SimulationResult,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/result", get(handlers::get_result))
        .route("/hourly", get(handlers::get_hourly))
        .route("/recommendations", get(handlers::get_recommendations))
        .route("/simulate", post(handlers::post_simulate))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns `SimError::Io` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<(), SimError> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
