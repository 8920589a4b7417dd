//! Operator controls: actuators, watering and maintenance.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Actuator, MaintenanceReport, SystemStatus};
use crate::SimService;

// ---

pub fn router() -> Router<SimService> {
    // ---
    Router::new()
        .route("/api/control", post(control))
        .route("/api/water", post(water))
        .route("/api/maintenance", get(maintenance))
        .route("/api/maintenance/complete", post(complete_maintenance))
}

/// Body of `POST /api/control`.
#[derive(Debug, Deserialize)]
pub struct ControlRequest {
    action: Actuator,
    value: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WaterResponse {
    pump_off_at: DateTime<Utc>,
}

async fn control(
    State(service): State<SimService>,
    Json(request): Json<ControlRequest>,
) -> Json<SystemStatus> {
    debug!("POST /api/control - {:?}", request);
    Json(service.control(request.action, request.value).await)
}

async fn water(State(service): State<SimService>) -> Json<WaterResponse> {
    debug!("POST /api/water");
    let pump_off_at = service.water(Utc::now()).await;
    Json(WaterResponse { pump_off_at })
}

async fn maintenance(State(service): State<SimService>) -> Json<MaintenanceReport> {
    Json(service.maintenance(Utc::now()).await)
}

async fn complete_maintenance(State(service): State<SimService>) -> Json<MaintenanceReport> {
    debug!("POST /api/maintenance/complete");
    Json(service.complete_maintenance(Utc::now()).await)
}
