//! The telemetry simulator.
//!
//! All simulated state lives in [`SimState`]. Every mutation is an explicit
//! method call taking the current time (and, for ticks, a random source), so
//! the whole model runs without timers, locks or a runtime. The async
//! [`crate::service`] layer owns the clock and the timers and calls into this
//! module; tests drive it directly.
//!
//! A tick runs three steps in order:
//! 1. recompute the environment,
//! 2. advance plant health using the environment of the *previous* tick,
//! 3. synthesize one telemetry record per plant from the new environment.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use rand::Rng;

use crate::models::{
    Actuator, EnvironmentalConditions, MaintenanceReport, PlantHealthData, PlantKind,
    SystemStatus, Telemetry,
};

pub mod environment;
pub mod plant;
pub mod telemetry;

pub use telemetry::{History, ReadingContext, HISTORY_CAPACITY};

// ---

/// Days between services before maintenance is flagged.
pub const MAINTENANCE_INTERVAL_DAYS: f64 = 14.0;

pub const MAINTENANCE_TASKS: [&str; 4] = [
    "Clean sensors",
    "Check pH calibration",
    "Inspect tubing",
    "Replace filters",
];

/// Tunables that shape the simulation but are not themselves simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub history_capacity: usize,
    /// Offset used to turn wall-clock time into a local time of day.
    pub utc_offset: FixedOffset,
    /// LED duty reported while the light is on during the day.
    pub led_pwm: u8,
    /// How long the pump runs after a watering request.
    pub watering: Duration,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            utc_offset: Utc.fix(),
            led_pwm: 75,
            watering: Duration::milliseconds(5000),
        }
    }
}

/// Complete simulated garden.
#[derive(Debug, Clone)]
pub struct SimState {
    pub environment: EnvironmentalConditions,
    pub plants: BTreeMap<PlantKind, PlantHealthData>,
    pub status: SystemStatus,
    pub history: History,
    /// When the pump turns itself off after watering; at most one pending.
    pub pump_off_at: Option<DateTime<Utc>>,
    pub params: SimParams,
    pub ticks: u64,
}

impl SimState {
    /// Fresh garden as it looks when the dashboard first opens.
    pub fn new(now: DateTime<Utc>, params: SimParams) -> Self {
        // ---
        let mut plants = BTreeMap::new();
        plants.insert(PlantKind::Brahmi, PlantHealthData::new(85.0, 0.7, 0.1, now));
        plants.insert(
            PlantKind::Ashwagandha,
            PlantHealthData::new(78.0, 0.6, 0.15, now),
        );

        let environment = EnvironmentalConditions::default();
        let mut history = History::with_capacity(params.history_capacity);
        for pod in PlantKind::ALL {
            history.push(Telemetry {
                ts: now,
                temp_c: environment.temperature,
                rh: environment.humidity,
                soil: 59.0,
                ph: 6.4,
                lux: environment.light_intensity,
                pump_pwm: 0,
                led_pwm: params.led_pwm,
                pod,
                npk: "3-5-2".to_string(),
                co2: environment.co2_level,
                air_flow: environment.air_flow,
            });
        }

        Self {
            environment,
            plants,
            status: SystemStatus::initial(now),
            history,
            pump_off_at: None,
            params,
            ticks: 0,
        }
    }

    /// Run one simulator tick in place.
    pub fn tick<R: Rng + ?Sized>(&mut self, now: DateTime<Utc>, rng: &mut R) {
        // ---
        let time_of_day = environment::time_of_day(now, self.params.utc_offset);

        let previous = self.environment;
        self.environment = environment::simulate(time_of_day, self.status.fan_active, rng);

        for (kind, plant) in self.plants.iter_mut() {
            plant.advance(*kind, &previous, now);
        }

        let ctx = ReadingContext {
            now,
            time_of_day,
            environment: &self.environment,
            status: &self.status,
            average_growth: self.average_growth(),
            led_pwm: self.params.led_pwm,
        };
        let mut records = Vec::with_capacity(PlantKind::ALL.len());
        for pod in PlantKind::ALL {
            records.push(telemetry::synthesize(pod, &ctx, &mut *rng));
        }
        for record in records {
            self.history.push(record);
        }

        self.ticks += 1;
    }

    pub fn average_growth(&self) -> f64 {
        if self.plants.is_empty() {
            return 0.0;
        }
        self.plants.values().map(|p| p.growth).sum::<f64>() / self.plants.len() as f64
    }

    /// Flip one actuator. Switching the pump by hand drops any pending
    /// automatic shut-off.
    pub fn control_system(&mut self, actuator: Actuator, value: bool) {
        // ---
        self.status.set(actuator, value);
        if actuator == Actuator::Pump {
            self.pump_off_at = None;
        }
    }

    /// Mark every plant as watered and run the pump until the returned
    /// deadline. Calling again while watering moves the deadline instead of
    /// stacking a second shut-off.
    pub fn water_plants(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        // ---
        for plant in self.plants.values_mut() {
            plant.last_watered = now;
        }
        self.status.pump_active = true;

        let deadline = now + self.params.watering;
        self.pump_off_at = Some(deadline);
        deadline
    }

    /// Turn the pump off if the watering deadline has passed.
    pub fn release_pump_if_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.pump_off_at {
            Some(deadline) if deadline <= now => {
                self.status.pump_active = false;
                self.pump_off_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn check_maintenance(&self, now: DateTime<Utc>) -> MaintenanceReport {
        check_maintenance(self.status.last_maintenance, now)
    }

    pub fn complete_maintenance(&mut self, now: DateTime<Utc>) {
        self.status.last_maintenance = now;
    }
}

/// Pure reducer: the state one tick after `state`.
pub fn step<R: Rng + ?Sized>(state: &SimState, now: DateTime<Utc>, rng: &mut R) -> SimState {
    let mut next = state.clone();
    next.tick(now, rng);
    next
}

/// Report whether the system is overdue for service.
pub fn check_maintenance(
    last_maintenance: DateTime<Utc>,
    now: DateTime<Utc>,
) -> MaintenanceReport {
    // ---
    let elapsed_days = (now - last_maintenance).num_milliseconds() as f64 / 86_400_000.0;

    if elapsed_days > MAINTENANCE_INTERVAL_DAYS {
        MaintenanceReport {
            needed: true,
            days: elapsed_days.floor() as i64,
            tasks: MAINTENANCE_TASKS.iter().map(|t| t.to_string()).collect(),
        }
    } else {
        MaintenanceReport {
            needed: false,
            days: 0,
            tasks: Vec::new(),
        }
    }
}
