//! Configuration loader for the `herbtech-sim` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Nothing else in the crate reads `env::var`.
//!
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{FixedOffset, Offset, Utc};

use crate::simulator::HISTORY_CAPACITY;

/// Parse an optional environment variable, failing if it is set but invalid.
macro_rules! parse_env_opt {
    ($var_name:expr, $ty:ty) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        parse_env_opt!($var_name, $ty).unwrap_or($default)
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Address the HTTP API binds to.
    pub bind_addr: SocketAddr,

    /// Period of the simulator tick.
    pub tick_interval: Duration,

    /// Maximum number of telemetry records kept in memory.
    pub history_capacity: usize,

    /// Period of the demo event roll.
    pub event_interval: Duration,

    /// Fixed RNG seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,

    /// Offset used to derive the local time of day for the day/night cycle.
    pub utc_offset: FixedOffset,

    /// Base URL of an external live-telemetry feed to poll, if any.
    pub live_telemetry_url: Option<String>,

    /// Plant id passed to the live-telemetry feed.
    pub live_plant_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            tick_interval: Duration::from_millis(2000),
            history_capacity: HISTORY_CAPACITY,
            event_interval: Duration::from_millis(10_000),
            seed: None,
            utc_offset: Utc.fix(),
            live_telemetry_url: None,
            live_plant_id: "brahmi".to_string(),
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `BIND_ADDR` – listen address (default: 0.0.0.0:8080)
/// - `TICK_INTERVAL_MS` – simulator tick period (default: 2000)
/// - `HISTORY_CAPACITY` – retained telemetry records (default: 2000)
/// - `EVENT_INTERVAL_MS` – demo event period (default: 10000)
/// - `SIM_SEED` – RNG seed (default: random)
/// - `SIM_UTC_OFFSET_MINUTES` – local time offset (default: 0)
/// - `LIVE_TELEMETRY_URL` – live feed base URL (default: disabled)
/// - `LIVE_PLANT_ID` – plant id for the live feed (default: brahmi)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let bind_addr = parse_env!("BIND_ADDR", SocketAddr, defaults.bind_addr);
    let tick_ms = parse_env!("TICK_INTERVAL_MS", u64, 2000);
    let history_capacity = parse_env!("HISTORY_CAPACITY", usize, defaults.history_capacity);
    let event_ms = parse_env!("EVENT_INTERVAL_MS", u64, 10_000);
    let seed = parse_env_opt!("SIM_SEED", u64);
    let offset_minutes = parse_env!("SIM_UTC_OFFSET_MINUTES", i32, 0);

    if tick_ms == 0 || event_ms == 0 {
        return Err(anyhow!("TICK_INTERVAL_MS and EVENT_INTERVAL_MS must be positive"));
    }
    if history_capacity == 0 {
        return Err(anyhow!("HISTORY_CAPACITY must be positive"));
    }
    let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
        .ok_or_else(|| anyhow!("Invalid SIM_UTC_OFFSET_MINUTES: {}", offset_minutes))?;

    let live_telemetry_url = env::var("LIVE_TELEMETRY_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let live_plant_id = env::var("LIVE_PLANT_ID").unwrap_or(defaults.live_plant_id);

    Ok(Config {
        bind_addr,
        tick_interval: Duration::from_millis(tick_ms),
        history_capacity,
        event_interval: Duration::from_millis(event_ms),
        seed,
        utc_offset,
        live_telemetry_url,
        live_plant_id,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  BIND_ADDR              : {}", self.bind_addr);
        tracing::info!("  TICK_INTERVAL_MS       : {}", self.tick_interval.as_millis());
        tracing::info!("  HISTORY_CAPACITY       : {}", self.history_capacity);
        tracing::info!("  EVENT_INTERVAL_MS      : {}", self.event_interval.as_millis());
        tracing::info!("  SIM_SEED               : {:?}", self.seed);
        tracing::info!("  SIM_UTC_OFFSET_MINUTES : {}", self.utc_offset.local_minus_utc() / 60);
        tracing::info!(
            "  LIVE_TELEMETRY_URL     : {}",
            self.live_telemetry_url.as_deref().unwrap_or("(disabled)")
        );
        tracing::info!("  LIVE_PLANT_ID          : {}", self.live_plant_id);
    }
}
