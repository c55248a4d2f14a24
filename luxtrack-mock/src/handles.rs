use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use luxtrack_api::{
    CommandRequest, CommandResponse, DeviceConfig, DeviceStatusPayload, LightSensorPayload,
};
use time::OffsetDateTime;

use crate::emulator::Emulator;

pub fn emulator_router(emulator: Arc<Emulator>) -> Router {
    Router::new()
        .route("/mock/bc4/:device_id/status", get(get_device_status))
        .route("/mock/bc4/:device_id/lightSensor", get(get_light_sensor))
        .route("/mock/bc4/:device_id/command", post(send_command))
        .route(
            "/mock/bc4/:device_id/config",
            get(get_device_config).put(update_device_config),
        )
        .with_state(emulator)
}

pub async fn get_device_status(
    State(emulator): State<Arc<Emulator>>,
    Path(device_id): Path<String>,
) -> Json<DeviceStatusPayload> {
    tracing::debug!("get device status: {}", device_id);

    Json(emulator.status(&device_id, OffsetDateTime::now_utc()))
}

pub async fn get_light_sensor(
    State(emulator): State<Arc<Emulator>>,
    Path(device_id): Path<String>,
) -> Json<LightSensorPayload> {
    let payload = emulator.light_reading(&device_id, OffsetDateTime::now_utc());

    tracing::debug!("light sensor {}: {:.2} lux", device_id, payload.light_value);

    Json(payload)
}

pub async fn send_command(
    State(emulator): State<Arc<Emulator>>,
    Path(device_id): Path<String>,
    Json(body): Json<CommandRequest>,
) -> Json<CommandResponse> {
    tracing::debug!("send command: {} -> {}", device_id, body.command);

    emulator.device_state(&device_id);
    tokio::time::sleep(emulator.command_delay()).await;

    Json(CommandResponse {
        device_id,
        command: body.command,
        success: true,
        message: "Command executed".to_string(),
        timestamp: OffsetDateTime::now_utc(),
        data: body.params,
    })
}

pub async fn get_device_config(
    State(emulator): State<Arc<Emulator>>,
    Path(device_id): Path<String>,
) -> Json<DeviceConfig> {
    tracing::debug!("get device config: {}", device_id);

    Json(emulator.default_config(&device_id, OffsetDateTime::now_utc()))
}

pub async fn update_device_config(
    Path(device_id): Path<String>,
    Json(mut config): Json<DeviceConfig>,
) -> Json<DeviceConfig> {
    tracing::debug!("update device config: {}", device_id);

    config.device_id = Some(device_id);
    config.timestamp = Some(OffsetDateTime::now_utc());

    Json(config)
}
