use std::time::Duration;

use async_trait::async_trait;
use luxtrack_api::LightSensorPayload;
use reqwest::Client;
use time::OffsetDateTime;

use crate::configs::DeviceApi;
use crate::errors::FetchError;
use crate::models::Device;

/// A reading as reported by a device, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedReading {
    pub light_value: f64,
    /// Acquisition time reported by the device, if any
    pub timestamp: Option<OffsetDateTime>,
    pub data_source: Option<String>,
}

impl From<LightSensorPayload> for FetchedReading {
    fn from(payload: LightSensorPayload) -> Self {
        Self {
            light_value: payload.light_value,
            timestamp: payload.timestamp,
            data_source: payload.data_source,
        }
    }
}

/// Source of the current reading of a device.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn fetch(&self, device: &Device) -> Result<FetchedReading, FetchError>;
}

/// Device API reached over HTTP, `GET {base_url}/{device_code}/lightSensor`.
pub struct HttpDeviceSource {
    client: Client,
    base_url: String,
}

impl HttpDeviceSource {
    pub fn new(device_api: &DeviceApi) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(device_api.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: device_api.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn light_sensor_url(&self, device_code: &str) -> String {
        format!("{}/{}/lightSensor", self.base_url, device_code)
    }
}

#[async_trait]
impl DeviceSource for HttpDeviceSource {
    async fn fetch(&self, device: &Device) -> Result<FetchedReading, FetchError> {
        let url = self.light_sensor_url(&device.code);
        tracing::debug!(device_code = %device.code, "GET {}", url);

        let payload: LightSensorPayload = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(payload.into())
    }
}
