use std::sync::Arc;
use std::time::Duration;

use luxtrack_api::{Id, ReadingResponse};
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::DeviceSource;
use super::query_service::to_response;
use crate::errors::{ApiError, CollectionFailure, FetchError, PersistenceError, ReadingError};
use crate::models::{Device, Reading};
use crate::repositories::{DeviceRegistry, ReadingStore};

/// Source tag used when the device API does not name one.
pub const DEFAULT_DATA_SOURCE: &str = "bc4_pro";

const COLLECTION_METHOD: &str = "api";

/// Fetches, normalizes and stores the reading of a single device.
pub struct CollectionWorker {
    devices: Arc<dyn DeviceRegistry>,
    readings: Arc<dyn ReadingStore>,
    source: Arc<dyn DeviceSource>,
    fetch_timeout: Duration,
}

impl CollectionWorker {
    pub fn new(
        devices: Arc<dyn DeviceRegistry>,
        readings: Arc<dyn ReadingStore>,
        source: Arc<dyn DeviceSource>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            devices,
            readings,
            source,
            fetch_timeout,
        }
    }

    pub async fn collect(&self, device: &Device) -> Result<Reading, CollectionFailure> {
        tracing::debug!(device_code = %device.code, "collecting light reading");

        let fetched = tokio::time::timeout(self.fetch_timeout, self.source.fetch(device))
            .await
            .unwrap_or(Err(FetchError::Timeout(self.fetch_timeout)))
            .map_err(|e| CollectionFailure::new(&device.code, e))?;

        let light_value =
            normalize(fetched.light_value).map_err(|e| CollectionFailure::new(&device.code, e))?;

        let now = OffsetDateTime::now_utc();
        let reading = Reading {
            id: 0,
            device_id: device.id,
            tenant_id: device.tenant_id,
            light_value,
            timestamp: fetched.timestamp.unwrap_or(now),
            data_source: fetched
                .data_source
                .filter(|source| !source.is_empty())
                .unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string()),
            metadata: Some(json!({
                "collection_method": COLLECTION_METHOD,
                "collection_time": now.format(&Rfc3339).unwrap_or_default(),
                "device_code": device.code,
                "device_name": device.name,
            })),
            created_at: now,
        };

        // The write is detached from this future so it completes even if the caller goes away
        let readings = self.readings.clone();
        let stored = tokio::spawn(async move { readings.append(&reading).await })
            .await
            .map_err(PersistenceError::from)
            .and_then(|result| result)
            .map_err(|e| CollectionFailure::new(&device.code, e))?;

        tracing::info!(
            device_code = %device.code,
            "collected light reading: {} lux",
            stored.light_value
        );

        Ok(stored)
    }

    /// Collects the device with `device_code` in `tenant_id` right away.
    pub async fn manual_collect(
        &self,
        device_code: &str,
        tenant_id: Id,
    ) -> Result<ReadingResponse, ApiError> {
        let device = self
            .devices
            .find_by_code(device_code, tenant_id)
            .await?
            .ok_or_else(|| ReadingError::DeviceNotFound(device_code.to_string()))?;

        let reading = self.collect(&device).await?;

        Ok(to_response(reading, Some(&device)))
    }
}

/// Light values are finite, non-negative and kept to two decimals.
fn normalize(light_value: f64) -> Result<f64, FetchError> {
    if !light_value.is_finite() || light_value < 0.0 {
        return Err(FetchError::MalformedPayload(format!(
            "light value {light_value} is not a non-negative number"
        )));
    }

    Ok((light_value * 100.0).round() / 100.0)
}
