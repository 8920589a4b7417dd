//! Synthetic sensor records and the capped history they are kept in.

use std::collections::VecDeque;
use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::environment::{is_daytime, round_to};
use crate::models::{EnvironmentalConditions, PlantKind, SystemStatus, Telemetry};

// ---

/// Default number of records retained.
pub const HISTORY_CAPACITY: usize = 2000;

/// Everything a record is derived from besides randomness.
#[derive(Debug, Clone, Copy)]
pub struct ReadingContext<'a> {
    pub now: DateTime<Utc>,
    pub time_of_day: f64,
    pub environment: &'a EnvironmentalConditions,
    pub status: &'a SystemStatus,
    /// Mean growth across all plants, 0–1.
    pub average_growth: f64,
    /// Duty applied while the LED is on during daylight.
    pub led_pwm: u8,
}

/// Produce one record for `pod`.
pub fn synthesize<R: Rng + ?Sized>(
    pod: PlantKind,
    ctx: &ReadingContext<'_>,
    rng: &mut R,
) -> Telemetry {
    // ---
    let watering = if ctx.status.pump_active { 20.0 } else { 0.0 };
    let daily = 10.0 * (2.0 * PI * ctx.time_of_day).sin();
    let soil = (60.0 + daily + watering + rng.gen_range(-4.0..4.0)).clamp(20.0, 90.0);

    let ph = (6.4_f64 + rng.gen_range(-0.2..0.2)).clamp(5.5, 7.5);

    let jitter = rng.gen_range(-0.25..0.25);
    let n = (3.0 + ctx.average_growth + jitter).clamp(1.0, 5.0);
    let p = (5.0 + ctx.average_growth + jitter).clamp(2.0, 7.0);
    let k = (2.0 + ctx.average_growth + jitter).clamp(1.0, 4.0);

    let pump_pwm = if ctx.status.pump_active { 100 } else { 0 };
    let led_pwm = if ctx.status.led_active && is_daytime(ctx.time_of_day) {
        ctx.led_pwm
    } else {
        0
    };

    Telemetry {
        ts: ctx.now,
        temp_c: ctx.environment.temperature,
        rh: ctx.environment.humidity,
        soil: round_to(soil, 1),
        ph: round_to(ph, 1),
        lux: ctx.environment.light_intensity,
        pump_pwm,
        led_pwm,
        pod,
        npk: format_npk(n, p, k),
        co2: ctx.environment.co2_level,
        air_flow: ctx.environment.air_flow,
    }
}

fn format_npk(n: f64, p: f64, k: f64) -> String {
    format!("{}-{}-{}", n.round() as i64, p.round() as i64, k.round() as i64)
}

/// FIFO buffer of records; the oldest entry is evicted once full.
#[derive(Debug, Clone)]
pub struct History {
    records: VecDeque<Telemetry>,
    capacity: usize,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: Telemetry) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Telemetry> {
        self.records.iter()
    }

    pub fn latest_for(&self, pod: PlantKind) -> Option<&Telemetry> {
        self.records.iter().rev().find(|r| r.pod == pod)
    }

    /// The newest `limit` records, optionally for one pod, oldest first.
    pub fn recent(&self, pod: Option<PlantKind>, limit: usize) -> Vec<Telemetry> {
        // ---
        let mut newest: Vec<Telemetry> = self
            .records
            .iter()
            .rev()
            .filter(|r| pod.map_or(true, |p| r.pod == p))
            .take(limit)
            .cloned()
            .collect();
        newest.reverse();
        newest
    }
}
