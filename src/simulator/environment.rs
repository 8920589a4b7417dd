//! Chamber climate: a day/night cycle plus uniform noise.

use std::f64::consts::PI;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use rand::Rng;

use crate::models::EnvironmentalConditions;

// ---

/// Fraction of the local day elapsed, 0.0 at midnight.
pub fn time_of_day(now: DateTime<Utc>, offset: FixedOffset) -> f64 {
    // ---
    let local = now.with_timezone(&offset);
    (local.hour() as f64 + local.minute() as f64 / 60.0) / 24.0
}

/// Daylight runs from 06:00 to 18:00 exclusive.
pub fn is_daytime(time_of_day: f64) -> bool {
    time_of_day > 0.25 && time_of_day < 0.75
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Whole lux, never negative (and never `-0.0`).
fn whole_lux(light: f64) -> f64 {
    light.max(0.0).round()
}

/// Recompute the whole environment for one tick.
pub fn simulate<R: Rng + ?Sized>(
    time_of_day: f64,
    fan_active: bool,
    rng: &mut R,
) -> EnvironmentalConditions {
    // ---
    let daytime = is_daytime(time_of_day);

    let temperature = 22.0 + 3.0 * (2.0 * PI * time_of_day).sin() + rng.gen_range(-1.0..1.0);

    // Humidity falls as the air warms
    let humidity =
        (70.0 - 2.0 * (temperature - 22.0) + rng.gen_range(-5.0..5.0)).clamp(40.0, 90.0);

    // 30% chance of cloud cover
    let base_light: f64 = if daytime { 800.0 } else { 50.0 };
    let cloud_cover = if rng.gen::<f64>() > 0.7 { 0.3 } else { 1.0 };
    let light = base_light * cloud_cover + rng.gen_range(-50.0..50.0);

    let plant_activity: f64 = if daytime { 50.0 } else { -30.0 };
    let ventilation = if fan_active { -20.0 } else { 0.0 };
    let co2 = (400.0 + plant_activity + ventilation).clamp(350.0, 600.0);

    let base_air_flow: f64 = if fan_active { 0.8 } else { 0.2 };
    let air_flow = (base_air_flow + rng.gen_range(-0.15..0.15)).clamp(0.0, 1.0);

    EnvironmentalConditions {
        temperature: round_to(temperature, 1),
        humidity: round_to(humidity, 1),
        light_intensity: whole_lux(light),
        co2_level: co2.round(),
        air_flow: round_to(air_flow, 2),
    }
}
