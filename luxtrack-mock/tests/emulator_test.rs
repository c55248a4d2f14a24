use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use luxtrack_api::{CommandResponse, DeviceConfig, DeviceStatusPayload, LightSensorPayload};
use luxtrack_mock::create_app;
use luxtrack_mock::emulator::Emulator;
use luxtrack_mock::simulate::IlluminationModel;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

fn test_app() -> Router {
    create_app(Arc::new(Emulator::new(
        IlluminationModel::default(),
        StdRng::seed_from_u64(2024),
        100..=300,
    )))
}

async fn send<T: DeserializeOwned>(app: &Router, request: Request<Body>) -> T {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_status_is_stable_per_device() {
    let app = test_app();

    let request = || {
        Request::builder()
            .uri("/mock/bc4/BC4-001/status")
            .method(Method::GET)
            .body(Body::empty())
            .unwrap()
    };

    let first: DeviceStatusPayload = send(&app, request()).await;
    let second: DeviceStatusPayload = send(&app, request()).await;

    assert!(first.online);
    assert_eq!(first.device_id, "BC4-001");
    assert_eq!(first.battery_level, second.battery_level);
    assert_eq!(first.signal_strength, second.signal_strength);
    assert!((80..=99).contains(&first.battery_level));
}

#[tokio::test]
async fn test_light_sensor_reading() {
    let app = test_app();

    let request = Request::builder()
        .uri("/mock/bc4/BC4-002/lightSensor")
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let payload: LightSensorPayload = send(&app, request).await;

    assert_eq!(payload.device_id, "BC4-002");
    assert_eq!(payload.data_source.as_deref(), Some("mock"));
    assert_eq!(payload.unit.as_deref(), Some("lux"));
    assert!(payload.timestamp.is_some());
    assert!((0.0..=1000.0).contains(&payload.light_value));
}

#[tokio::test(start_paused = true)]
async fn test_command_is_acknowledged_after_delay() {
    let app = test_app();
    let started = tokio::time::Instant::now();

    let request = Request::builder()
        .uri("/mock/bc4/BC4-003/command")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({ "command": "set_light", "params": { "level": 3 } }).to_string(),
        ))
        .unwrap();

    let response: CommandResponse = send(&app, request).await;
    let elapsed = started.elapsed().as_millis();

    assert!(response.success);
    assert_eq!(response.command, "set_light");
    assert_eq!(response.data.get("level"), Some(&json!(3)));
    assert!((100..=300).contains(&elapsed), "elapsed {elapsed}ms");
}

#[tokio::test]
async fn test_config_get_and_echo() {
    let app = test_app();

    let request = Request::builder()
        .uri("/mock/bc4/BC4-004/config")
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let config: DeviceConfig = send(&app, request).await;
    assert_eq!(config.device_id.as_deref(), Some("BC4-004"));
    assert_eq!(config.video_quality.as_deref(), Some("1080p"));

    let request = Request::builder()
        .uri("/mock/bc4/BC4-004/config")
        .method(Method::PUT)
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({ "deviceId": "ignored", "nightVision": false }).to_string(),
        ))
        .unwrap();

    let config: DeviceConfig = send(&app, request).await;
    assert_eq!(config.device_id.as_deref(), Some("BC4-004"));
    assert_eq!(config.night_vision, Some(false));
    assert!(config.timestamp.is_some());
}
