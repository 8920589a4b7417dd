//! Operator advice and performance figures derived from the current state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::EnvironmentalConditions;
use crate::simulator::SimState;

// ---

/// Below this the heater should come on (°C).
pub const HEATER_BELOW_C: f64 = 20.0;
/// Below this plants want more frequent watering (% RH).
pub const WATER_BELOW_RH: f64 = 55.0;
/// Above this the fan should run (ppm).
pub const FAN_ABOVE_PPM: f64 = 600.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    ActivateHeater,
    IncreaseWatering,
    RunFan,
    MaintenanceOverdue { days: i64, tasks: Vec<String> },
    AllOptimal,
}

impl Recommendation {
    pub fn message(&self) -> String {
        match self {
            Self::ActivateHeater => {
                "Temperature is below optimal range. Consider activating the heater.".to_string()
            }
            Self::IncreaseWatering => {
                "Humidity is low. Consider increasing watering frequency.".to_string()
            }
            Self::RunFan => "CO2 levels are high. Ventilation fan recommended.".to_string(),
            Self::MaintenanceOverdue { days, tasks } => format!(
                "Maintenance overdue by {} days. Required tasks: {}",
                days,
                tasks.join(", ")
            ),
            Self::AllOptimal => {
                "All systems are operating within optimal parameters.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// Weighted mix of plant health and running equipment, in percent.
    pub system_efficiency: f64,
    pub plant_health_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub recommendations: Vec<Advised>,
    pub performance: Performance,
}

/// A recommendation with its rendered message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advised {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub message: String,
}

/// Climate-driven advice; independent of maintenance.
pub fn climate_recommendations(env: &EnvironmentalConditions) -> Vec<Recommendation> {
    // ---
    let mut out = Vec::new();
    if env.temperature < HEATER_BELOW_C {
        out.push(Recommendation::ActivateHeater);
    }
    if env.humidity < WATER_BELOW_RH {
        out.push(Recommendation::IncreaseWatering);
    }
    if env.co2_level > FAN_ABOVE_PPM {
        out.push(Recommendation::RunFan);
    }
    out
}

pub fn performance(state: &SimState) -> Performance {
    // ---
    let health_average = if state.plants.is_empty() {
        0.0
    } else {
        state.plants.values().map(|p| p.health).sum::<f64>() / state.plants.len() as f64
    };

    let mut efficiency = health_average * 0.6;
    if state.status.led_active {
        efficiency += 20.0;
    }
    if state.status.pump_active {
        efficiency += 10.0;
    }
    if state.status.fan_active {
        efficiency += 10.0;
    }

    Performance {
        system_efficiency: efficiency.round(),
        plant_health_average: health_average.round(),
    }
}

/// Everything the control panel shows beside the switches.
pub fn advise(state: &SimState, now: DateTime<Utc>) -> Advice {
    // ---
    let mut recommendations = climate_recommendations(&state.environment);

    // "All optimal" is shown whenever no maintenance is due, even beside
    // climate advice.
    let maintenance = state.check_maintenance(now);
    if maintenance.needed {
        recommendations.push(Recommendation::MaintenanceOverdue {
            days: maintenance.days,
            tasks: maintenance.tasks,
        });
    } else {
        recommendations.push(Recommendation::AllOptimal);
    }

    Advice {
        recommendations: recommendations
            .into_iter()
            .map(|recommendation| Advised {
                message: recommendation.message(),
                recommendation,
            })
            .collect(),
        performance: performance(state),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::simulator::SimParams;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 26, 12, 0, 0).unwrap()
    }

    fn env(temperature: f64, humidity: f64, co2_level: f64) -> EnvironmentalConditions {
        EnvironmentalConditions {
            temperature,
            humidity,
            co2_level,
            ..EnvironmentalConditions::default()
        }
    }

    #[test]
    fn test_heater_threshold() {
        // ---
        assert!(climate_recommendations(&env(19.9, 65.0, 450.0))
            .contains(&Recommendation::ActivateHeater));
        assert!(climate_recommendations(&env(20.0, 65.0, 450.0)).is_empty());
    }

    #[test]
    fn test_humidity_threshold() {
        // ---
        assert_eq!(
            climate_recommendations(&env(22.0, 54.9, 450.0)),
            vec![Recommendation::IncreaseWatering]
        );
        assert!(climate_recommendations(&env(22.0, 55.0, 450.0)).is_empty());
    }

    #[test]
    fn test_co2_threshold() {
        // ---
        assert_eq!(
            climate_recommendations(&env(22.0, 65.0, 601.0)),
            vec![Recommendation::RunFan]
        );
        assert!(climate_recommendations(&env(22.0, 65.0, 600.0)).is_empty());
    }

    #[test]
    fn test_all_three_at_once() {
        // ---
        let advice = climate_recommendations(&env(15.0, 45.0, 700.0));
        assert_eq!(
            advice,
            vec![
                Recommendation::ActivateHeater,
                Recommendation::IncreaseWatering,
                Recommendation::RunFan,
            ]
        );
    }

    #[test]
    fn test_all_optimal_unless_maintenance_due() {
        // ---
        let mut state = SimState::new(now(), SimParams::default());
        let fresh = advise(&state, now());
        assert_eq!(fresh.recommendations.len(), 1);
        assert_eq!(fresh.recommendations[0].recommendation, Recommendation::AllOptimal);

        state.status.last_maintenance = now() - Duration::days(20);
        let overdue = advise(&state, now());
        assert_eq!(overdue.recommendations.len(), 1);
        let Recommendation::MaintenanceOverdue { days, tasks } =
            &overdue.recommendations[0].recommendation
        else {
            panic!("expected maintenance advice");
        };
        assert_eq!(*days, 20);
        assert_eq!(tasks.len(), 4);
        assert!(overdue.recommendations[0].message.contains("overdue by 20 days"));
    }

    #[test]
    fn test_performance() {
        // ---
        let mut state = SimState::new(now(), SimParams::default());

        // Health 85 and 78, LED on: 81.5 * 0.6 + 20 = 68.9
        let initial = performance(&state);
        assert_eq!(initial.plant_health_average, 82.0);
        assert_eq!(initial.system_efficiency, 69.0);

        state.status.pump_active = true;
        state.status.fan_active = true;
        assert_eq!(performance(&state).system_efficiency, 89.0);

        state.status.led_active = false;
        state.status.pump_active = false;
        state.status.fan_active = false;
        assert_eq!(performance(&state).system_efficiency, 49.0);
    }

    #[test]
    fn test_json_shape() {
        // ---
        let state = SimState::new(now(), SimParams::default());
        let json = serde_json::to_value(advise(&state, now())).unwrap();
        assert_eq!(json["recommendations"][0]["kind"], "all_optimal");
        assert_eq!(json["performance"]["systemEfficiency"], 69.0);
    }
}
