use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use tracing::debug;

use crate::recommendations::Advice;
use crate::SimService;

// ---

pub fn router() -> Router<SimService> {
    Router::new().route("/api/recommendations", get(recommendations))
}

/// Climate advice, maintenance notice and performance figures.
async fn recommendations(State(service): State<SimService>) -> Json<Advice> {
    debug!("GET /api/recommendations");
    Json(service.recommendations(Utc::now()).await)
}
