//! Client side of the external live-telemetry feed.
//!
//! The feed is owned by another service. This module only fixes the JSON
//! shapes it is expected to send and polls its HTTP fallback endpoint
//! (`GET {base}/api/telemetry/latest?plantId=...`). Nothing here serves
//! that endpoint.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info};

// ---

/// Default polling period of the HTTP fallback.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilHealth {
    Optimal,
    Good,
    Dry,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightCondition {
    Optimal,
    Good,
    Minimal,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FertilizationStatus {
    Balanced,
    High,
    Low,
    Needed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantMetrics {
    pub chlorophyll_a: f64,
    pub chlorophyll_b: f64,
    pub soil_health: SoilHealth,
    pub light_condition: LightCondition,
    /// Percent.
    pub humidity_level: f64,
    pub fertilization_status: FertilizationStatus,
    /// Percent change.
    pub growth_rate: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthData {
    pub month: String,
    pub value: f64,
    /// Percent change.
    pub change: f64,
}

/// Push messages on the streaming transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    MetricsUpdate {
        metrics: PlantMetrics,
    },
    GrowthUpdate {
        #[serde(rename = "growthData")]
        growth_data: Vec<GrowthData>,
    },
}

pub fn parse_message(text: &str) -> Result<LiveMessage> {
    serde_json::from_str(text).map_err(|e| anyhow!("Failed to parse live message: {}", e))
}

/// Body of the HTTP fallback endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestTelemetry {
    pub metrics: PlantMetrics,
    #[serde(rename = "growthData")]
    pub growth_data: Vec<GrowthData>,
}

/// What the consumer currently knows about one plant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveView {
    pub metrics: Option<PlantMetrics>,
    pub growth_data: Vec<GrowthData>,
    pub error: Option<String>,
}

impl LiveView {
    pub fn apply(&mut self, message: LiveMessage) {
        match message {
            LiveMessage::MetricsUpdate { metrics } => self.metrics = Some(metrics),
            LiveMessage::GrowthUpdate { growth_data } => self.growth_data = growth_data,
        }
    }

    pub fn apply_latest(&mut self, latest: LatestTelemetry) {
        self.metrics = Some(latest.metrics);
        self.growth_data = latest.growth_data;
        self.error = None;
    }
}

/// Polls the HTTP fallback for one plant.
#[derive(Debug, Clone)]
pub struct LiveTelemetryClient {
    client: Client,
    base_url: String,
    plant_id: String,
}

impl LiveTelemetryClient {
    pub fn new(base_url: impl Into<String>, plant_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            plant_id: plant_id.into(),
        }
    }

    /// `GET {base}/api/telemetry/latest` with an encoded `plantId` query.
    pub fn latest_request(&self) -> RequestBuilder {
        self.client
            .get(format!("{}/api/telemetry/latest", self.base_url))
            .query(&[("plantId", &self.plant_id)])
    }

    pub async fn fetch_latest(&self) -> Result<LatestTelemetry> {
        // ---
        debug!(
            "Fetching live telemetry from {} for {}",
            self.base_url, self.plant_id
        );

        let response = self.latest_request().send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to fetch telemetry: HTTP {}",
                response.status()
            ));
        }
        Ok(response.json::<LatestTelemetry>().await?)
    }

    /// Fetch once and fold the outcome into `view`.
    pub async fn refresh(&self, view: &RwLock<LiveView>) {
        // ---
        match self.fetch_latest().await {
            Ok(latest) => {
                debug!(
                    "Live metrics for {}: {} growth points",
                    self.plant_id,
                    latest.growth_data.len()
                );
                view.write().await.apply_latest(latest);
            }
            Err(e) => {
                error!("Telemetry fetch error for {}: {}", self.plant_id, e);
                view.write().await.error = Some(e.to_string());
            }
        }
    }

    /// Poll every `interval` until `shutdown` flips to true.
    pub async fn poll(
        self,
        view: Arc<RwLock<LiveView>>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        // ---
        info!("Polling live telemetry for plant {}", self.plant_id);
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh(&view).await,
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }
        }
        info!("Live telemetry poller stopped");
    }
}
