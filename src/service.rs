//! Shared simulation service.
//!
//! `SimService` is a cheap, cloneable handle around the single [`SimState`]
//! plus the settings and alert log that sit beside it. HTTP handlers call its
//! operations; [`SimService::run`] is the only place timers live.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::{watch, Mutex, Notify, RwLock};
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::care::CareReport;
use crate::config::Config;
use crate::events::{self, Alert, AlertLog};
use crate::live::LiveView;
use crate::models::{
    Actuator, EnvironmentalConditions, MaintenanceReport, PlantHealthData, PlantKind,
    SystemStatus, Telemetry,
};
use crate::recommendations::{self, Advice};
use crate::settings::{EnvironmentReport, Settings};
use crate::simulator::{SimParams, SimState};

// ---

/// Point-in-time view of the garden.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub environment: EnvironmentalConditions,
    pub plant_health: BTreeMap<PlantKind, PlantHealthData>,
    pub system_status: SystemStatus,
    pub pump_off_at: Option<DateTime<Utc>>,
    pub ticks: u64,
    pub history_len: usize,
}

struct Inner {
    state: RwLock<SimState>,
    settings: RwLock<Settings>,
    alerts: RwLock<AlertLog>,
    /// Filled by the live-telemetry poller when one is configured.
    live: Arc<RwLock<LiveView>>,
    rng: Mutex<StdRng>,
    /// Wakes the driver when the pump deadline changes.
    watering: Notify,
    tick_interval: Duration,
    event_interval: Duration,
}

#[derive(Clone)]
pub struct SimService {
    inner: Arc<Inner>,
}

impl SimService {
    pub fn new(config: &Config) -> Self {
        // ---
        let settings = Settings::default();
        let params = SimParams {
            history_capacity: config.history_capacity,
            utc_offset: config.utc_offset,
            led_pwm: settings.led_pwm,
            watering: chrono::Duration::milliseconds(settings.watering_ms as i64),
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::from_parts(
            SimState::new(Utc::now(), params),
            settings,
            rng,
            config.tick_interval,
            config.event_interval,
        )
    }

    pub fn from_parts(
        state: SimState,
        settings: Settings,
        rng: StdRng,
        tick_interval: Duration,
        event_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                settings: RwLock::new(settings),
                alerts: RwLock::new(AlertLog::default()),
                live: Arc::new(RwLock::new(LiveView::default())),
                rng: Mutex::new(rng),
                watering: Notify::new(),
                tick_interval,
                event_interval,
            }),
        }
    }

    // --- simulator

    pub async fn tick(&self, now: DateTime<Utc>) {
        // ---
        let mut rng = self.inner.rng.lock().await;
        let mut state = self.inner.state.write().await;
        state.tick(now, &mut *rng);

        debug!(
            tick = state.ticks,
            temperature = state.environment.temperature,
            humidity = state.environment.humidity,
            light = state.environment.light_intensity,
            co2 = state.environment.co2_level,
            air_flow = state.environment.air_flow,
            "Simulator tick"
        );
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.inner.state.read().await;
        Snapshot {
            environment: state.environment,
            plant_health: state.plants.clone(),
            system_status: state.status.clone(),
            pump_off_at: state.pump_off_at,
            ticks: state.ticks,
            history_len: state.history.len(),
        }
    }

    pub async fn history(&self, pod: Option<PlantKind>, limit: usize) -> Vec<Telemetry> {
        self.inner.state.read().await.history.recent(pod, limit)
    }

    pub async fn care(&self, pod: PlantKind) -> Option<CareReport> {
        let state = self.inner.state.read().await;
        state.history.latest_for(pod).map(CareReport::from_reading)
    }

    pub async fn environment_status(&self) -> EnvironmentReport {
        let environment = self.inner.state.read().await.environment;
        let settings = self.inner.settings.read().await;
        EnvironmentReport::new(&environment, &settings)
    }

    pub async fn recommendations(&self, now: DateTime<Utc>) -> Advice {
        recommendations::advise(&*self.inner.state.read().await, now)
    }

    // --- controls

    pub async fn control(&self, actuator: Actuator, value: bool) -> SystemStatus {
        // ---
        let mut state = self.inner.state.write().await;
        state.control_system(actuator, value);
        info!("Actuator {:?} set to {}", actuator, value);
        if actuator == Actuator::Pump {
            self.inner.watering.notify_one();
        }
        state.status.clone()
    }

    /// Water every plant; returns when the pump will switch off.
    pub async fn water(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        // ---
        let deadline = self.inner.state.write().await.water_plants(now);
        self.inner.watering.notify_one();
        info!("Watering plants, pump off at {}", deadline);
        deadline
    }

    pub async fn release_pump(&self, now: DateTime<Utc>) -> bool {
        let released = self.inner.state.write().await.release_pump_if_due(now);
        if released {
            info!("Watering finished, pump off");
        }
        released
    }

    pub async fn maintenance(&self, now: DateTime<Utc>) -> MaintenanceReport {
        self.inner.state.read().await.check_maintenance(now)
    }

    pub async fn complete_maintenance(&self, now: DateTime<Utc>) -> MaintenanceReport {
        let mut state = self.inner.state.write().await;
        state.complete_maintenance(now);
        info!("Maintenance recorded at {}", now);
        state.check_maintenance(now)
    }

    // --- settings

    pub async fn settings(&self) -> Settings {
        self.inner.settings.read().await.clone()
    }

    /// Replace the settings after validation; the simulator picks up the
    /// LED duty and watering duration immediately.
    pub async fn update_settings(&self, new: Settings) -> Result<Settings> {
        // ---
        new.validate()?;
        {
            let mut state = self.inner.state.write().await;
            state.params.led_pwm = new.led_pwm;
            state.params.watering = chrono::Duration::milliseconds(new.watering_ms as i64);
        }
        *self.inner.settings.write().await = new.clone();
        info!("Settings updated: {:?}", new);
        Ok(new)
    }

    pub async fn reset_settings(&self) -> Settings {
        // Defaults always validate
        match self.update_settings(Settings::default()).await {
            Ok(settings) => settings,
            Err(_) => self.settings().await,
        }
    }

    // --- alerts

    pub async fn alerts(&self) -> Vec<Alert> {
        self.inner.alerts.read().await.all()
    }

    pub async fn acknowledge(&self, id: Uuid) -> bool {
        self.inner.alerts.write().await.acknowledge(id)
    }

    pub async fn roll_event(&self, now: DateTime<Utc>) -> Option<Alert> {
        // ---
        let event = events::roll(&mut *self.inner.rng.lock().await)?;
        let alert = Alert::from_event(event, now);
        info!(event = ?event, "{}", alert.message);
        self.inner.alerts.write().await.push(alert.clone());
        Some(alert)
    }

    // --- live feed

    /// Shared view for the live-telemetry poller to write into.
    pub fn live_view(&self) -> Arc<RwLock<LiveView>> {
        Arc::clone(&self.inner.live)
    }

    pub async fn live(&self) -> LiveView {
        self.inner.live.read().await.clone()
    }

    // --- driver

    async fn pump_deadline(&self) -> Option<Instant> {
        let deadline = self.inner.state.read().await.pump_off_at?;
        let remaining = (deadline - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        Some(Instant::now() + remaining)
    }

    /// Drive ticks, the pump shut-off and demo events until `shutdown` is set.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        // ---
        let start = Instant::now();
        let mut ticker = interval_at(start + self.inner.tick_interval, self.inner.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut event_ticker =
            interval_at(start + self.inner.event_interval, self.inner.event_interval);
        event_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Simulator running: tick every {:?}, events every {:?}",
            self.inner.tick_interval, self.inner.event_interval
        );

        loop {
            let pump_due = self.pump_deadline().await;

            tokio::select! {
                _ = ticker.tick() => self.tick(Utc::now()).await,
                _ = event_ticker.tick() => {
                    self.roll_event(Utc::now()).await;
                }
                _ = sleep_until(pump_due.unwrap_or_else(Instant::now)), if pump_due.is_some() => {
                    self.release_pump(Utc::now()).await;
                }
                _ = self.inner.watering.notified() => {}
                _ = shutdown.changed() => break,
            }

            if *shutdown.borrow() {
                break;
            }
        }
        info!("Simulator stopped");
    }
}
