use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::events::Alert;
use crate::SimService;

// ---

pub fn router() -> Router<SimService> {
    // ---
    Router::new()
        .route("/api/alerts", get(list))
        .route("/api/alerts/{id}/ack", post(acknowledge))
}

async fn list(State(service): State<SimService>) -> Json<Vec<Alert>> {
    Json(service.alerts().await)
}

async fn acknowledge(Path(id): Path<Uuid>, State(service): State<SimService>) -> impl IntoResponse {
    // ---
    if service.acknowledge(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(format!("No alert with id {}", id))).into_response()
    }
}
