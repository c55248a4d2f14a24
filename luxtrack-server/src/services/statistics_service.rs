use std::sync::Arc;

use luxtrack_api::{DEFAULT_TENANT_ID, StatisticsQuery, StatisticsResponse};

use super::query_service::resolve_window;
use crate::errors::{ApiError, ReadingError};
use crate::repositories::{DeviceRegistry, ReadingStore};

pub struct StatisticsService {
    devices: Arc<dyn DeviceRegistry>,
    readings: Arc<dyn ReadingStore>,
}

impl StatisticsService {
    pub fn new(devices: Arc<dyn DeviceRegistry>, readings: Arc<dyn ReadingStore>) -> Self {
        Self { devices, readings }
    }

    /// Aggregates over the window plus the latest reading, which ignores the window.
    pub async fn statistics(&self, query: &StatisticsQuery) -> Result<StatisticsResponse, ApiError> {
        let tenant_id = query.tenant_id.unwrap_or(DEFAULT_TENANT_ID);
        let (start_time, end_time) = resolve_window(query.start_time, query.end_time)?;

        let device = self
            .devices
            .find_by_id(query.device_id)
            .await?
            .ok_or_else(|| ReadingError::DeviceNotFound(query.device_id.to_string()))?;

        let aggregate = self
            .readings
            .aggregate(device.id, start_time, end_time)
            .await?;
        let latest = self.readings.latest(device.id, tenant_id).await?;

        Ok(StatisticsResponse {
            device_id: device.id,
            device_code: device.code,
            device_name: device.name,
            start_time,
            end_time,
            total_count: aggregate.count,
            avg_light_value: aggregate.avg,
            min_light_value: aggregate.min,
            max_light_value: aggregate.max,
            latest_light_value: latest.as_ref().map(|r| r.light_value),
            latest_timestamp: latest.map(|r| r.timestamp),
        })
    }
}
