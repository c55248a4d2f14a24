use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::Id;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingResponse {
    /// Reading identifier
    pub id: i64,
    /// Device the reading belongs to
    pub device_id: Id,
    /// Device code, absent once the device is gone from the registry
    pub device_code: Option<String>,
    /// Device display name
    pub device_name: Option<String>,
    /// Tenant the reading is tagged with
    pub tenant_id: Id,
    /// Illumination in lux
    pub light_value: f64,
    /// Acquisition time
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Origin of the reading, e.g. `mock` or `bc4_pro`
    pub data_source: String,
    /// Collection metadata
    pub metadata: Option<Value>,
    /// Write time
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingQueryRequest {
    pub device_id: Option<Id>,
    pub device_code: Option<String>,
    pub tenant_id: Option<Id>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub data_source: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuery {
    pub device_id: Option<Id>,
    pub device_code: Option<String>,
    pub tenant_id: Option<Id>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentQuery {
    pub device_id: Id,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    pub device_id: Id,
    pub tenant_id: Option<Id>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectQuery {
    pub device_code: String,
    pub tenant_id: Option<Id>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub device_id: Id,
    pub device_code: String,
    pub device_name: String,
    /// Window start
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Window end
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Readings inside the window
    pub total_count: u64,
    /// Absent when the window is empty
    pub avg_light_value: Option<f64>,
    pub min_light_value: Option<f64>,
    pub max_light_value: Option<f64>,
    /// Most recent reading of the device, regardless of the window
    pub latest_light_value: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub latest_timestamp: Option<OffsetDateTime>,
}
