use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::live::LiveView;
use crate::SimService;

// ---

pub fn router() -> Router<SimService> {
    Router::new().route("/api/live", get(live))
}

/// Last metrics, growth series and fetch error from the external feed.
/// Empty when no feed is configured.
async fn live(State(service): State<SimService>) -> Json<LiveView> {
    debug!("GET /api/live");
    Json(service.live().await)
}
