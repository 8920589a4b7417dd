use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::service::Snapshot;
use crate::settings::EnvironmentReport;
use crate::SimService;

// ---

pub fn router() -> Router<SimService> {
    // ---
    Router::new()
        .route("/api/snapshot", get(snapshot))
        .route("/api/environment/status", get(environment_status))
}

/// Environment, per-plant health and actuator flags in one document.
async fn snapshot(State(service): State<SimService>) -> Json<Snapshot> {
    debug!("GET /api/snapshot");
    Json(service.snapshot().await)
}

/// Current conditions graded against the configured targets.
async fn environment_status(State(service): State<SimService>) -> Json<EnvironmentReport> {
    debug!("GET /api/environment/status");
    Json(service.environment_status().await)
}
