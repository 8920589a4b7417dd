use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use herbtech_sim::live::LiveTelemetryClient;
use herbtech_sim::{routes, Config, SimService};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Telemetry {
    ts: DateTime<Utc>,
    #[serde(rename = "tempC")]
    temp_c: f64,
    rh: f64,
    soil: f64,
    ph: f64,
    pod: String,
    npk: String,
    co2: f64,
}

/// Serve the full router on an ephemeral port and return its base URL.
async fn spawn_app() -> Result<(String, SimService)> {
    // ---
    let config = Config {
        seed: Some(42),
        ..Config::default()
    };
    let service = SimService::new(&config);
    let app = routes::router(service.clone());

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}", addr), service))
}

#[tokio::test]
async fn health_and_snapshot() -> Result<()> {
    // ---
    let (base, _service) = spawn_app().await?;
    let client = Client::new();

    let health: Value = client.get(format!("{}/health", base)).send().await?.json().await?;
    assert_eq!(health["status"], "ok");

    let snap: Value = client
        .get(format!("{}/api/snapshot", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(snap["plantHealth"]["brahmi"]["health"], 85.0);
    assert_eq!(snap["systemStatus"]["ledActive"], true);
    assert_eq!(snap["ticks"], 0);

    Ok(())
}

#[tokio::test]
async fn history_is_tagged_and_filtered() -> Result<()> {
    // ---
    let (base, service) = spawn_app().await?;
    let client = Client::new();

    for _ in 0..5 {
        service.tick(Utc::now()).await;
    }

    let all: Vec<Telemetry> = client
        .get(format!("{}/api/history?limit=4", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].ts <= w[1].ts));

    let brahmi: Vec<Telemetry> = client
        .get(format!("{}/api/history?pod=brahmi", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(brahmi.len(), 6);
    for r in &brahmi {
        assert_eq!(r.pod, "brahmi");
        assert!((20.0..=90.0).contains(&r.soil));
        assert!((5.5..=7.5).contains(&r.ph));
        assert!((40.0..=90.0).contains(&r.rh));
        assert!((350.0..=600.0).contains(&r.co2));
        assert!(r.temp_c > 0.0);
        assert_eq!(r.npk.split('-').count(), 3);
    }

    let bad = client
        .get(format!("{}/api/history?pod=basil", base))
        .send()
        .await?;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let care: Value = client
        .get(format!("{}/api/plants/ashwagandha/care", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(care["pod"], "ashwagandha");
    assert_eq!(care["items"].as_array().map(|a| a.len()), Some(4));

    Ok(())
}

#[tokio::test]
async fn controls_do_not_touch_environment() -> Result<()> {
    // ---
    let (base, _service) = spawn_app().await?;
    let client = Client::new();

    let before: Value = client.get(format!("{}/api/snapshot", base)).send().await?.json().await?;

    let status: Value = client
        .post(format!("{}/api/control", base))
        .json(&json!({ "action": "fan", "value": true }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(status["fanActive"], true);

    client
        .post(format!("{}/api/control", base))
        .json(&json!({ "action": "fan", "value": false }))
        .send()
        .await?;

    let after: Value = client.get(format!("{}/api/snapshot", base)).send().await?.json().await?;
    assert_eq!(before["environment"], after["environment"]);
    assert_eq!(after["systemStatus"]["fanActive"], false);

    let unknown = client
        .post(format!("{}/api/control", base))
        .json(&json!({ "action": "sprinkler", "value": true }))
        .send()
        .await?;
    assert!(unknown.status().is_client_error());

    Ok(())
}

#[tokio::test]
async fn watering_sets_single_deadline() -> Result<()> {
    // ---
    let (base, _service) = spawn_app().await?;
    let client = Client::new();

    let first: Value = client.post(format!("{}/api/water", base)).send().await?.json().await?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second: Value = client.post(format!("{}/api/water", base)).send().await?.json().await?;

    let first: DateTime<Utc> = first["pumpOffAt"].as_str().unwrap_or_default().parse()?;
    let second: DateTime<Utc> = second["pumpOffAt"].as_str().unwrap_or_default().parse()?;
    assert!(second > first);

    let snap: Value = client.get(format!("{}/api/snapshot", base)).send().await?.json().await?;
    assert_eq!(snap["systemStatus"]["pumpActive"], true);
    let pending: DateTime<Utc> = snap["pumpOffAt"].as_str().unwrap_or_default().parse()?;
    assert_eq!(pending, second);

    Ok(())
}

#[tokio::test]
async fn settings_are_validated() -> Result<()> {
    // ---
    let (base, _service) = spawn_app().await?;
    let client = Client::new();

    let mut settings: Value = client.get(format!("{}/api/settings", base)).send().await?.json().await?;
    assert_eq!(settings["wateringMs"], 5000);
    assert_eq!(settings["ledPWM"], 75);
    assert_eq!(settings["targetCO2"], 450.0);

    settings["wateringMs"] = json!(60_000);
    let rejected = client
        .put(format!("{}/api/settings", base))
        .json(&settings)
        .send()
        .await?;
    assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);

    settings["wateringMs"] = json!(3000);
    settings["ledPWM"] = json!(40);
    settings["targetCO2"] = json!(500);
    let saved: Value = client
        .put(format!("{}/api/settings", base))
        .json(&settings)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(saved["wateringMs"], 3000);
    assert_eq!(saved["ledPWM"], 40);
    assert_eq!(saved["targetCO2"], 500.0);

    let reset: Value = client
        .post(format!("{}/api/settings/reset", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(reset["wateringMs"], 5000);

    let status: Value = client
        .get(format!("{}/api/environment/status", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(status["temperature"], "optimal");

    Ok(())
}

#[tokio::test]
async fn maintenance_and_alerts() -> Result<()> {
    // ---
    let (base, service) = spawn_app().await?;
    let client = Client::new();

    // Fresh state was serviced a week ago
    let report: Value = client.get(format!("{}/api/maintenance", base)).send().await?.json().await?;
    assert_eq!(report["needed"], false);
    assert_eq!(report["days"], 0);

    let alerts: Vec<Value> = client.get(format!("{}/api/alerts", base)).send().await?.json().await?;
    assert!(alerts.is_empty());

    // Roll until an event fires
    let mut fired = None;
    for _ in 0..500 {
        if let Some(alert) = service.roll_event(Utc::now()).await {
            fired = Some(alert);
            break;
        }
    }
    let alert = fired.expect("an event should fire within 500 rolls");

    let ack = client
        .post(format!("{}/api/alerts/{}/ack", base, alert.id))
        .send()
        .await?;
    assert_eq!(ack.status(), StatusCode::NO_CONTENT);

    let alerts: Vec<Value> = client.get(format!("{}/api/alerts", base)).send().await?.json().await?;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["acknowledged"], true);

    let missing = client
        .post(format!("{}/api/alerts/{}/ack", base, uuid::Uuid::new_v4()))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn recommendations_and_performance() -> Result<()> {
    // ---
    let (base, _service) = spawn_app().await?;
    let client = Client::new();

    let advice: Value = client
        .get(format!("{}/api/recommendations", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(advice["recommendations"][0]["kind"], "all_optimal");
    assert!(advice["recommendations"][0]["message"].is_string());
    assert_eq!(advice["performance"]["plantHealthAverage"], 82.0);
    assert_eq!(advice["performance"]["systemEfficiency"], 69.0);

    Ok(())
}

const LATEST_BODY: &str = r#"{
    "metrics": {
        "chlorophyllA": 1.8,
        "chlorophyllB": 0.6,
        "soilHealth": "good",
        "lightCondition": "optimal",
        "humidityLevel": 68.5,
        "fertilizationStatus": "balanced",
        "growthRate": 3.2,
        "lastUpdated": "2025-03-26T12:00:00Z"
    },
    "growthData": [{"month": "Jan", "value": 12.0, "change": 4.5}]
}"#;

/// Stand-in for the external feed; answers only for `plantId=brahmi`.
async fn spawn_feed() -> Result<String> {
    // ---
    use axum::extract::Query;
    use axum::http::{header, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::get;

    async fn latest(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
        if params.get("plantId").map(String::as_str) != Some("brahmi") {
            return AxumStatus::NOT_FOUND.into_response();
        }
        ([(header::CONTENT_TYPE, "application/json")], LATEST_BODY).into_response()
    }

    let app = axum::Router::new().route("/api/telemetry/latest", get(latest));
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn live_feed_is_exposed() -> Result<()> {
    // ---
    let (base, service) = spawn_app().await?;
    let feed = spawn_feed().await?;
    let client = Client::new();

    let empty: Value = client.get(format!("{}/api/live", base)).send().await?.json().await?;
    assert!(empty["metrics"].is_null());
    assert!(empty["error"].is_null());

    LiveTelemetryClient::new(feed.clone(), "brahmi")
        .refresh(&service.live_view())
        .await;

    let live: Value = client.get(format!("{}/api/live", base)).send().await?.json().await?;
    assert_eq!(live["metrics"]["soilHealth"], "good");
    assert_eq!(live["growthData"][0]["month"], "Jan");
    assert!(live["error"].is_null());

    // Unknown plant: the feed answers 404 and the error is recorded
    LiveTelemetryClient::new(feed, "tulsi")
        .refresh(&service.live_view())
        .await;
    let live: Value = client.get(format!("{}/api/live", base)).send().await?.json().await?;
    assert!(live["error"].as_str().unwrap_or_default().contains("404"));
    assert_eq!(live["metrics"]["soilHealth"], "good");

    Ok(())
}
