//! Plant health model.
//!
//! Each plant kind has an optimal growing window. Conditions are scored by
//! closeness to the optimum and blended into a target health; the actual
//! health then drifts toward that target by at most [`MAX_HEALTH_STEP`] per
//! tick so the dashboard never jumps.

use chrono::{DateTime, Duration, Utc};

use crate::models::{EnvironmentalConditions, PlantHealthData, PlantKind};

// ---

/// Largest health change the environment can cause in a single tick.
pub const MAX_HEALTH_STEP: f64 = 2.0;

/// Days without water after which a plant loses one health point per tick.
pub const DRY_SPELL_DAYS: i64 = 2;

/// A tolerated band with its sweet spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

impl Band {
    const fn new(min: f64, max: f64, optimal: f64) -> Self {
        Self { min, max, optimal }
    }

    /// 1.0 at the optimum, falling linearly to 0.0 one band-width away.
    pub fn score(&self, value: f64) -> f64 {
        (1.0 - (value - self.optimal).abs() / (self.max - self.min)).max(0.0)
    }
}

/// Preferred conditions for one plant kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalWindow {
    pub temperature: Band,
    pub humidity: Band,
    pub light: Band,
    pub soil: Band,
}

pub fn optimal_window(kind: PlantKind) -> OptimalWindow {
    match kind {
        PlantKind::Brahmi => OptimalWindow {
            temperature: Band::new(22.0, 26.0, 24.0),
            humidity: Band::new(60.0, 80.0, 70.0),
            light: Band::new(400.0, 800.0, 600.0),
            soil: Band::new(55.0, 75.0, 65.0),
        },
        PlantKind::Ashwagandha => OptimalWindow {
            temperature: Band::new(20.0, 24.0, 22.0),
            humidity: Band::new(55.0, 75.0, 65.0),
            light: Band::new(500.0, 900.0, 700.0),
            soil: Band::new(50.0, 70.0, 60.0),
        },
    }
}

/// Health the plant would settle at if `conditions` held forever.
pub fn target_health(kind: PlantKind, conditions: &EnvironmentalConditions) -> f64 {
    // ---
    let window = optimal_window(kind);
    let temperature = window.temperature.score(conditions.temperature);
    let humidity = window.humidity.score(conditions.humidity);
    let light = window.light.score(conditions.light_intensity);

    ((temperature * 0.3 + humidity * 0.25 + light * 0.25 + 0.2) * 100.0).clamp(0.0, 100.0)
}

impl PlantHealthData {
    pub fn new(health: f64, growth: f64, stress: f64, last_watered: DateTime<Utc>) -> Self {
        Self {
            health,
            growth,
            stress,
            last_watered,
        }
    }

    /// Advance one tick under `conditions`.
    pub fn advance(
        &mut self,
        kind: PlantKind,
        conditions: &EnvironmentalConditions,
        now: DateTime<Utc>,
    ) {
        // ---
        let diff = target_health(kind, conditions) - self.health;
        let change = diff.signum() * diff.abs().min(MAX_HEALTH_STEP);
        self.health = (self.health + change).clamp(0.0, 100.0);

        if self.health > 70.0 {
            self.growth = (self.growth + 0.01).min(1.0);
        } else if self.health < 50.0 {
            self.growth = (self.growth - 0.005).max(0.0);
        }

        if self.health < 60.0 {
            self.stress = (self.stress + 0.02).min(1.0);
        } else {
            self.stress = (self.stress - 0.01).max(0.0);
        }

        if now - self.last_watered > Duration::days(DRY_SPELL_DAYS) {
            self.health = (self.health - 1.0).max(0.0);
        }
    }
}
