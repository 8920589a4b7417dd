//! Application entry point for the `herbtech-sim` service.
//!
//! This binary orchestrates the full startup sequence:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Starting the simulator driver (ticks, pump shut-off, demo events)
//! - Optionally polling an external live-telemetry feed
//! - Mounting all API routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving until Ctrl-C
//!
//! # Environment Variables
//! - `SIM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `SIM_SPAN_EVENTS` (optional) – span event mode for tracing
//! - see [`herbtech_sim::config::load_from_env`] for the rest
use std::env;

use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tokio::sync::watch;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

use herbtech_sim::live::{LiveTelemetryClient, POLL_INTERVAL};
use herbtech_sim::{config, routes, SimService};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let service = SimService::new(&cfg);
    let driver = tokio::spawn(service.clone().run(shutdown_rx.clone()));

    let poller = cfg.live_telemetry_url.as_ref().map(|url| {
        let client = LiveTelemetryClient::new(url.clone(), cfg.live_plant_id.clone());
        tokio::spawn(client.poll(service.live_view(), POLL_INTERVAL, shutdown_rx.clone()))
    });

    // Build app from routes gateway (EMBP)
    let app: Router = routes::router(service);

    tracing::info!("Listening on {}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the timers once the server has drained
    let _ = shutdown_tx.send(true);
    driver.await?;
    if let Some(poller) = poller {
        poller.await?;
    }

    Ok(())
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, shutting down");
}

// ---

/// Install the compact `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `SIM_LOG_LEVEL` picks the level and
/// hyper/reqwest are held at `warn`. `SIM_SPAN_EVENTS` (`full`,
/// `enter_exit`) widens span events beyond CLOSE, and `FORCE_COLOR`
/// overrides TTY colour detection.
fn init_tracing() {
    // ---
    let span_events = match env::var("SIM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("SIM_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},hyper=warn,reqwest=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
