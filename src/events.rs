//! Background demo events surfaced as dashboard alerts.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---

/// Chance that an event fires on a given event interval.
pub const EVENT_PROBABILITY: f64 = 0.15;

/// Alerts retained before the oldest is dropped.
pub const ALERT_LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoEvent {
    AutoWatering,
    ThermalCap,
    LightCycleStart,
    NutrientCheck,
}

impl DemoEvent {
    pub const ALL: [DemoEvent; 4] = [
        DemoEvent::AutoWatering,
        DemoEvent::ThermalCap,
        DemoEvent::LightCycleStart,
        DemoEvent::NutrientCheck,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            DemoEvent::AutoWatering => "Auto watering activated",
            DemoEvent::ThermalCap => "Temperature regulation active",
            DemoEvent::LightCycleStart => "Light cycle initiated",
            DemoEvent::NutrientCheck => "Nutrient levels optimal",
        }
    }

    pub fn kind(&self) -> AlertKind {
        match self {
            DemoEvent::AutoWatering | DemoEvent::NutrientCheck => AlertKind::Info,
            DemoEvent::ThermalCap => AlertKind::Warning,
            DemoEvent::LightCycleStart => AlertKind::Success,
        }
    }
}

/// Roll for an event; `None` most of the time.
pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Option<DemoEvent> {
    if rng.gen::<f64>() < EVENT_PROBABILITY {
        Some(DemoEvent::ALL[rng.gen_range(0..DemoEvent::ALL.len())])
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Error,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
}

impl Alert {
    pub fn from_event(event: DemoEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: event.kind(),
            message: event.message().to_string(),
            timestamp: now,
            acknowledged: false,
        }
    }
}

/// Capped alert log, oldest first.
#[derive(Debug, Clone)]
pub struct AlertLog {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_capacity(ALERT_LOG_CAPACITY)
    }
}

impl AlertLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, alert: Alert) {
        while self.alerts.len() >= self.capacity {
            self.alerts.pop_front();
        }
        self.alerts.push_back(alert);
    }

    /// Mark an alert as seen. Returns false for unknown ids.
    pub fn acknowledge(&mut self, id: Uuid) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
