mod device;
mod reading;

pub use device::DeviceRepository;
pub use reading::ReadingRepository;

use async_trait::async_trait;
use luxtrack_api::Id;
use time::OffsetDateTime;

use crate::errors::PersistenceError;
use crate::models::{Device, Reading};

/// Read access to the device registry.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn find_by_id(&self, id: Id) -> Result<Option<Device>, PersistenceError>;

    /// Lookup by code within a tenant.
    async fn find_by_code(&self, code: &str, tenant_id: Id) -> Result<Option<Device>, PersistenceError>;

    /// Light-capable, non-deleted devices, optionally restricted to a tenant.
    async fn find_light_capable(&self, tenant_id: Option<Id>) -> Result<Vec<Device>, PersistenceError>;
}

/// Conditions of a windowed reading query.
#[derive(Debug, Clone)]
pub struct ReadingFilter {
    pub device_id: Option<Id>,
    pub tenant_id: Id,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub data_source: Option<String>,
}

/// Aggregates over a window. `avg`, `min` and `max` are `None` when `count` is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReadingAggregate {
    pub count: u64,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Append-only reading persistence. Every listing is ordered newest first by
/// timestamp, then by write time, then by id.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persists `reading`. Its `id` and `created_at` are assigned by the store.
    async fn append(&self, reading: &Reading) -> Result<Reading, PersistenceError>;

    async fn latest(&self, device_id: Id, tenant_id: Id) -> Result<Option<Reading>, PersistenceError>;

    /// One page of the readings matching `filter` plus the total match count.
    async fn find_page(
        &self,
        filter: &ReadingFilter,
        page: u32,
        size: u32,
    ) -> Result<(Vec<Reading>, u64), PersistenceError>;

    async fn recent(&self, device_id: Id, limit: u32) -> Result<Vec<Reading>, PersistenceError>;

    async fn aggregate(
        &self,
        device_id: Id,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
    ) -> Result<ReadingAggregate, PersistenceError>;
}
