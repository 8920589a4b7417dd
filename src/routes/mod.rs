//! HTTP gateway for the simulator service.
//!
//! Each sibling module owns its handlers and exports a subrouter; this
//! module merges them and attaches the shared [`SimService`] state so
//! `main.rs` never needs to know about individual endpoints.

use axum::Router;

use crate::SimService;

mod alerts;
mod control;
mod health;
mod live;
mod recommendations;
mod settings;
mod snapshot;
mod telemetry;

// ---

pub fn router(service: SimService) -> Router {
    // ---
    Router::new()
        .merge(snapshot::router())
        .merge(telemetry::router())
        .merge(control::router())
        .merge(recommendations::router())
        .merge(settings::router())
        .merge(alerts::router())
        .merge(live::router())
        .merge(health::router())
        .with_state(service)
}
