use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::PlantKind;
use crate::SimService;

// ---

/// Records returned when no `limit` is given.
const DEFAULT_LIMIT: usize = 200;

pub fn router() -> Router<SimService> {
    // ---
    Router::new()
        .route("/api/history", get(history))
        .route("/api/plants/{pod}/care", get(care))
}

/// Query parameters for filtering telemetry history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pod: Option<String>,
    limit: Option<usize>,
}

async fn history(
    Query(params): Query<HistoryQuery>,
    State(service): State<SimService>,
) -> impl IntoResponse {
    // ---
    debug!("GET /api/history - {:?}", params);

    let pod = match params.pod.as_deref().map(str::parse::<PlantKind>).transpose() {
        Ok(pod) => pod,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(e.to_string())).into_response(),
    };

    let records = service
        .history(pod, params.limit.unwrap_or(DEFAULT_LIMIT))
        .await;
    info!("Returning {} telemetry records", records.len());
    (StatusCode::OK, Json(records)).into_response()
}

async fn care(Path(pod): Path<String>, State(service): State<SimService>) -> impl IntoResponse {
    // ---
    let pod = match pod.parse::<PlantKind>() {
        Ok(pod) => pod,
        Err(e) => return (StatusCode::NOT_FOUND, Json(e.to_string())).into_response(),
    };

    match service.care(pod).await {
        Some(report) => (StatusCode::OK, Json(report)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(format!("No readings for pod '{}'", pod)),
        )
            .into_response(),
    }
}
