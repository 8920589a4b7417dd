//! Simulated hydroponic herb garden.
//!
//! The [`simulator`] module is a self-contained model of the grow chamber
//! driven by explicit ticks. [`service`] wraps it for concurrent use and owns
//! the timers, and [`routes`] exposes it over HTTP. Module boundaries follow
//! the Explicit Module Boundary Pattern (EMBP): siblings reach each other
//! through the re-exports below.

pub mod care;
pub mod config;
pub mod events;
pub mod live;
pub mod models;
pub mod recommendations;
pub mod routes;
pub mod service;
pub mod settings;
pub mod simulator;

pub use config::Config;
pub use models::{Actuator, PlantKind, Telemetry};
pub use service::SimService;
