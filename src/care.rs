//! Per-pod care indicator built from the latest reading.

use serde::Serialize;

use crate::models::{PlantKind, Telemetry};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CareLevel {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareItem {
    pub label: &'static str,
    pub value: String,
    pub care: CareLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareReport {
    pub pod: PlantKind,
    pub items: Vec<CareItem>,
}

fn soil_care(soil: f64) -> CareLevel {
    if (40.0..=80.0).contains(&soil) {
        CareLevel::Good
    } else if soil < 30.0 {
        CareLevel::Poor
    } else {
        CareLevel::Fair
    }
}

fn temperature_care(temp_c: f64) -> CareLevel {
    if (20.0..=26.0).contains(&temp_c) {
        CareLevel::Good
    } else if temp_c < 18.0 || temp_c > 28.0 {
        CareLevel::Poor
    } else {
        CareLevel::Fair
    }
}

fn humidity_care(rh: f64) -> CareLevel {
    if (60.0..=80.0).contains(&rh) {
        CareLevel::Good
    } else if rh < 50.0 || rh > 90.0 {
        CareLevel::Poor
    } else {
        CareLevel::Fair
    }
}

fn light_care(lux: f64) -> CareLevel {
    if lux >= 400.0 {
        CareLevel::Good
    } else if lux < 200.0 {
        CareLevel::Poor
    } else {
        CareLevel::Fair
    }
}

impl CareReport {
    pub fn from_reading(reading: &Telemetry) -> Self {
        // ---
        let items = vec![
            CareItem {
                label: "Soil",
                value: format!("{:.1}%", reading.soil),
                care: soil_care(reading.soil),
            },
            CareItem {
                label: "Temp",
                value: format!("{:.1}°C", reading.temp_c),
                care: temperature_care(reading.temp_c),
            },
            CareItem {
                label: "Humidity",
                value: format!("{:.1}%", reading.rh),
                care: humidity_care(reading.rh),
            },
            CareItem {
                label: "Light",
                value: format!("{} lux", reading.lux.round()),
                care: light_care(reading.lux),
            },
        ];

        Self {
            pod: reading.pod,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(soil: f64, temp_c: f64, rh: f64, lux: f64) -> Telemetry {
        Telemetry {
            ts: Utc.with_ymd_and_hms(2025, 3, 26, 12, 0, 0).unwrap(),
            temp_c,
            rh,
            soil,
            ph: 6.4,
            lux,
            pump_pwm: 0,
            led_pwm: 75,
            pod: PlantKind::Brahmi,
            npk: "3-5-2".to_string(),
            co2: 400.0,
            air_flow: 0.3,
        }
    }

    fn levels(report: &CareReport) -> Vec<CareLevel> {
        report.items.iter().map(|i| i.care).collect()
    }

    #[test]
    fn test_all_good() {
        // ---
        let report = CareReport::from_reading(&reading(60.0, 23.0, 70.0, 600.0));
        assert_eq!(levels(&report), vec![CareLevel::Good; 4]);
        assert_eq!(report.items[0].value, "60.0%");
        assert_eq!(report.items[3].value, "600 lux");
    }

    #[test]
    fn test_fair_band() {
        // ---
        let report = CareReport::from_reading(&reading(35.0, 27.0, 55.0, 300.0));
        assert_eq!(levels(&report), vec![CareLevel::Fair; 4]);
    }

    #[test]
    fn test_poor_band() {
        // ---
        let report = CareReport::from_reading(&reading(25.0, 30.0, 95.0, 50.0));
        assert_eq!(levels(&report), vec![CareLevel::Poor; 4]);
    }

    #[test]
    fn test_soil_above_good_band_is_fair() {
        // ---
        assert_eq!(soil_care(85.0), CareLevel::Fair);
        assert_eq!(temperature_care(17.5), CareLevel::Poor);
    }
}
