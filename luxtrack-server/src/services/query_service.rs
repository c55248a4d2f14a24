use std::collections::HashMap;
use std::sync::Arc;

use luxtrack_api::{DEFAULT_TENANT_ID, Id, Page, ReadingQueryRequest, ReadingResponse};
use time::{Duration, OffsetDateTime};

use crate::errors::{ApiError, ReadingError};
use crate::models::{Device, Reading};
use crate::repositories::{DeviceRegistry, ReadingFilter, ReadingStore};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_RECENT_LIMIT: u32 = 20;

/// Window used when a request leaves one or both bounds open.
pub const DEFAULT_WINDOW: Duration = Duration::days(7);

/// Fills the open bounds of a window, `[now - 7 days, now]` by default.
pub(crate) fn resolve_window(
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
) -> Result<(OffsetDateTime, OffsetDateTime), ReadingError> {
    let now = OffsetDateTime::now_utc();
    let start_time = start_time.unwrap_or(now - DEFAULT_WINDOW);
    let end_time = end_time.unwrap_or(now);

    if start_time > end_time {
        return Err(ReadingError::InvalidRequest(
            "startTime must not be after endTime".to_string(),
        ));
    }

    Ok((start_time, end_time))
}

pub struct QueryService {
    devices: Arc<dyn DeviceRegistry>,
    readings: Arc<dyn ReadingStore>,
}

impl QueryService {
    pub fn new(devices: Arc<dyn DeviceRegistry>, readings: Arc<dyn ReadingStore>) -> Self {
        Self { devices, readings }
    }

    /// Windowed, paginated readings of a device or of a whole tenant.
    pub async fn query(&self, request: &ReadingQueryRequest) -> Result<Page<ReadingResponse>, ApiError> {
        let tenant_id = request.tenant_id.unwrap_or(DEFAULT_TENANT_ID);
        let page = request.page.unwrap_or(0);
        let size = request.size.unwrap_or(DEFAULT_PAGE_SIZE);

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(ReadingError::InvalidRequest(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            ))
            .into());
        }

        let (start_time, end_time) = resolve_window(request.start_time, request.end_time)?;

        let device_id = match (request.device_id, &request.device_code) {
            (Some(device_id), _) => Some(device_id),
            (None, Some(device_code)) => Some(self.resolve_code(device_code, tenant_id).await?.id),
            (None, None) => None,
        };

        let filter = ReadingFilter {
            device_id,
            tenant_id,
            start_time,
            end_time,
            data_source: request.data_source.clone(),
        };

        let (readings, total) = self.readings.find_page(&filter, page, size).await?;
        let content = self.describe_all(readings).await?;

        Ok(Page::new(content, page, size, total))
    }

    /// Most recent reading of a device, addressed by id or by code.
    pub async fn latest_for(
        &self,
        device_id: Option<Id>,
        device_code: Option<&str>,
        tenant_id: Id,
    ) -> Result<ReadingResponse, ApiError> {
        let device_id = match (device_id, device_code) {
            (Some(device_id), _) => device_id,
            (None, Some(device_code)) => self.resolve_code(device_code, tenant_id).await?.id,
            (None, None) => return Err(ReadingError::MissingDeviceIdentifier.into()),
        };

        let reading = self
            .readings
            .latest(device_id, tenant_id)
            .await?
            .ok_or_else(|| ReadingError::ReadingNotFound(device_id.to_string()))?;

        self.describe(reading).await
    }

    /// The `limit` most recent readings of a device, whatever their age.
    pub async fn recent(&self, device_id: Id, limit: Option<u32>) -> Result<Vec<ReadingResponse>, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        if limit == 0 {
            return Err(ReadingError::InvalidRequest("limit must be at least 1".to_string()).into());
        }

        let readings = self.readings.recent(device_id, limit).await?;

        self.describe_all(readings).await
    }

    /// Response form of a single reading.
    pub async fn describe(&self, reading: Reading) -> Result<ReadingResponse, ApiError> {
        let device = self.devices.find_by_id(reading.device_id).await?;

        Ok(to_response(reading, device.as_ref()))
    }

    async fn resolve_code(&self, device_code: &str, tenant_id: Id) -> Result<Device, ApiError> {
        Ok(self
            .devices
            .find_by_code(device_code, tenant_id)
            .await?
            .ok_or_else(|| ReadingError::DeviceNotFound(device_code.to_string()))?)
    }

    async fn describe_all(&self, readings: Vec<Reading>) -> Result<Vec<ReadingResponse>, ApiError> {
        let mut devices: HashMap<Id, Option<Device>> = HashMap::new();

        for reading in &readings {
            if !devices.contains_key(&reading.device_id) {
                let device = self.devices.find_by_id(reading.device_id).await?;
                devices.insert(reading.device_id, device);
            }
        }

        Ok(readings
            .into_iter()
            .map(|reading| {
                let device = devices.get(&reading.device_id).and_then(Option::as_ref);
                to_response(reading, device)
            })
            .collect())
    }
}

/// Attaches the owning device's code and name when the device is still known.
pub(crate) fn to_response(reading: Reading, device: Option<&Device>) -> ReadingResponse {
    ReadingResponse {
        id: reading.id,
        device_id: reading.device_id,
        device_code: device.map(|d| d.code.clone()),
        device_name: device.map(|d| d.name.clone()),
        tenant_id: reading.tenant_id,
        light_value: reading.light_value,
        timestamp: reading.timestamp,
        data_source: reading.data_source,
        metadata: reading.metadata,
        created_at: reading.created_at,
    }
}
