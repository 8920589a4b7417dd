//! Data models for the simulated herb garden.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ---

/// Ambient conditions inside the grow chamber.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalConditions {
    // ---
    /// Air temperature, °C.
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// Light intensity, lux.
    pub light_intensity: f64,
    /// CO₂ concentration, ppm.
    pub co2_level: f64,
    /// Air flow as a fraction of fan capacity (0–1).
    pub air_flow: f64,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self {
            temperature: 22.0,
            humidity: 65.0,
            light_intensity: 600.0,
            co2_level: 400.0,
            air_flow: 0.3,
        }
    }
}

/// The plants grown in the demo pods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantKind {
    Brahmi,
    Ashwagandha,
}

impl PlantKind {
    pub const ALL: [PlantKind; 2] = [PlantKind::Brahmi, PlantKind::Ashwagandha];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlantKind::Brahmi => "brahmi",
            PlantKind::Ashwagandha => "ashwagandha",
        }
    }
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlantKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brahmi" => Ok(PlantKind::Brahmi),
            "ashwagandha" => Ok(PlantKind::Ashwagandha),
            other => Err(anyhow!("Unknown pod '{}'", other)),
        }
    }
}

/// Health bookkeeping for a single plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantHealthData {
    // ---
    /// Overall health score, 0–100.
    pub health: f64,
    /// Growth progress, 0–1.
    pub growth: f64,
    /// Accumulated stress, 0–1.
    pub stress: f64,
    pub last_watered: DateTime<Utc>,
}

/// Actuator flags driven by operator controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    // ---
    pub pump_active: bool,
    pub led_active: bool,
    pub fan_active: bool,
    pub heater_active: bool,
    pub last_maintenance: DateTime<Utc>,
}

impl SystemStatus {
    /// Start-up status: LED on, everything else off, serviced a week ago.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            pump_active: false,
            led_active: true,
            fan_active: false,
            heater_active: false,
            last_maintenance: now - Duration::days(7),
        }
    }

    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Pump => self.pump_active,
            Actuator::Led => self.led_active,
            Actuator::Fan => self.fan_active,
            Actuator::Heater => self.heater_active,
        }
    }

    pub fn set(&mut self, actuator: Actuator, value: bool) {
        let flag = match actuator {
            Actuator::Pump => &mut self.pump_active,
            Actuator::Led => &mut self.led_active,
            Actuator::Fan => &mut self.fan_active,
            Actuator::Heater => &mut self.heater_active,
        };
        *flag = value;
    }
}

/// A switchable piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Pump,
    Led,
    Fan,
    Heater,
}

/// One synthetic sensor record, as shown on the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    // ---
    pub ts: DateTime<Utc>,
    #[serde(rename = "tempC")]
    pub temp_c: f64,
    pub rh: f64,
    pub soil: f64,
    pub ph: f64,
    pub lux: f64,
    #[serde(rename = "pumpPWM")]
    pub pump_pwm: u8,
    #[serde(rename = "ledPWM")]
    pub led_pwm: u8,
    pub pod: PlantKind,
    pub npk: String,
    pub co2: f64,
    #[serde(rename = "airFlow")]
    pub air_flow: f64,
}

/// Result of a maintenance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceReport {
    pub needed: bool,
    pub days: i64,
    pub tasks: Vec<String>,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plant_kind_parsing() {
        // ---
        assert_eq!("brahmi".parse::<PlantKind>().unwrap(), PlantKind::Brahmi);
        assert_eq!(
            "Ashwagandha".parse::<PlantKind>().unwrap(),
            PlantKind::Ashwagandha
        );
        assert!("basil".parse::<PlantKind>().is_err());
    }

    #[test]
    fn test_actuator_flags() {
        // ---
        let now = Utc.with_ymd_and_hms(2025, 3, 26, 12, 0, 0).unwrap();
        let mut status = SystemStatus::initial(now);

        assert!(status.get(Actuator::Led));
        assert!(!status.get(Actuator::Fan));
        assert_eq!(status.last_maintenance, now - Duration::days(7));

        // No interlocks: heater and fan may run together
        status.set(Actuator::Fan, true);
        status.set(Actuator::Heater, true);
        assert!(status.fan_active && status.heater_active);
    }

    #[test]
    fn test_telemetry_json_field_names() {
        // ---
        let record = Telemetry {
            ts: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
            temp_c: 22.4,
            rh: 65.0,
            soil: 59.0,
            ph: 6.4,
            lux: 600.0,
            pump_pwm: 0,
            led_pwm: 75,
            pod: PlantKind::Brahmi,
            npk: "3-5-2".to_string(),
            co2: 400.0,
            air_flow: 0.3,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tempC"], 22.4);
        assert_eq!(json["ledPWM"], 75);
        assert_eq!(json["pod"], "brahmi");
        assert_eq!(json["airFlow"], 0.3);
    }
}
