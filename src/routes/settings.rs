use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, routing::post, Json,
    Router,
};
use tracing::{debug, warn};

use crate::settings::Settings;
use crate::SimService;

// ---

pub fn router() -> Router<SimService> {
    // ---
    Router::new()
        .route("/api/settings", get(read).put(replace))
        .route("/api/settings/reset", post(reset))
}

async fn read(State(service): State<SimService>) -> Json<Settings> {
    Json(service.settings().await)
}

async fn replace(
    State(service): State<SimService>,
    Json(settings): Json<Settings>,
) -> impl IntoResponse {
    // ---
    debug!("PUT /api/settings");
    match service.update_settings(settings).await {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(e) => {
            warn!("Rejected settings update: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(e.to_string())).into_response()
        }
    }
}

async fn reset(State(service): State<SimService>) -> Json<Settings> {
    debug!("POST /api/settings/reset");
    Json(service.reset_settings().await)
}
