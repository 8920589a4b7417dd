//! Operator settings and the environment status classifier.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::EnvironmentalConditions;

// ---

/// Grow-room settings as edited on the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    // ---
    pub photoperiod_hours: u8,
    pub soil_min: u8,
    pub soil_max: u8,
    #[serde(rename = "ledPWM")]
    pub led_pwm: u8,
    pub watering_ms: u32,
    pub target_temp: f64,
    pub target_humidity: f64,
    #[serde(rename = "targetCO2")]
    pub target_co2: f64,
    pub auto_watering: bool,
    pub auto_lighting: bool,
    pub auto_ventilation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            photoperiod_hours: 16,
            soil_min: 50,
            soil_max: 70,
            led_pwm: 75,
            watering_ms: 5000,
            target_temp: 22.0,
            target_humidity: 65.0,
            target_co2: 450.0,
            auto_watering: true,
            auto_lighting: true,
            auto_ventilation: true,
        }
    }
}

macro_rules! check_range {
    ($name:expr, $value:expr, $min:expr, $max:expr) => {
        if !($min..=$max).contains(&$value) {
            bail!("{} must be between {} and {}, got {}", $name, $min, $max, $value);
        }
    };
}

impl Settings {
    /// Reject values outside the ranges the settings form allows.
    pub fn validate(&self) -> Result<()> {
        // ---
        check_range!("photoperiodHours", self.photoperiod_hours, 8, 24);
        check_range!("soilMin", self.soil_min, 20, 80);
        check_range!("soilMax", self.soil_max, 20, 80);
        check_range!("ledPWM", self.led_pwm, 0, 100);
        check_range!("wateringMs", self.watering_ms, 1000, 10_000);
        check_range!("targetTemp", self.target_temp, 18.0, 30.0);
        check_range!("targetHumidity", self.target_humidity, 40.0, 90.0);
        check_range!("targetCO2", self.target_co2, 300.0, 800.0);

        if self.soil_min >= self.soil_max {
            bail!(
                "soilMin ({}) must be below soilMax ({})",
                self.soil_min,
                self.soil_max
            );
        }
        Ok(())
    }
}

/// How close a reading is to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentStatus {
    Optimal,
    Good,
    NeedsAttention,
}

/// Within `tolerance` is optimal, within twice that is good.
pub fn classify(current: f64, target: f64, tolerance: f64) -> EnvironmentStatus {
    let diff = (current - target).abs();
    if diff <= tolerance {
        EnvironmentStatus::Optimal
    } else if diff <= tolerance * 2.0 {
        EnvironmentStatus::Good
    } else {
        EnvironmentStatus::NeedsAttention
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentReport {
    pub temperature: EnvironmentStatus,
    pub humidity: EnvironmentStatus,
    pub co2_level: EnvironmentStatus,
}

impl EnvironmentReport {
    pub fn new(conditions: &EnvironmentalConditions, settings: &Settings) -> Self {
        Self {
            temperature: classify(conditions.temperature, settings.target_temp, 2.0),
            humidity: classify(conditions.humidity, settings.target_humidity, 2.0),
            co2_level: classify(conditions.co2_level, settings.target_co2, 50.0),
        }
    }
}
