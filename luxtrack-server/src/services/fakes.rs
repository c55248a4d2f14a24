use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use luxtrack_api::{DeviceStatus, DeviceType, Id};
use time::OffsetDateTime;

use super::{DeviceSource, FetchedReading};
use crate::errors::{FetchError, PersistenceError};
use crate::models::{Device, Reading};
use crate::repositories::{DeviceRegistry, ReadingAggregate, ReadingFilter, ReadingStore};

pub fn device(id: Id, code: &str) -> Device {
    Device {
        id,
        tenant_id: 0,
        code: code.to_string(),
        name: format!("Sensor {code}"),
        device_type: DeviceType::LightSensor.to_string(),
        status: DeviceStatus::Online.to_string(),
        created_at: OffsetDateTime::now_utc(),
        deleted_at: None,
    }
}

pub struct StaticRegistry {
    pub devices: Vec<Device>,
    pub broken: bool,
}

impl StaticRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            broken: false,
        }
    }
}

#[async_trait]
impl DeviceRegistry for StaticRegistry {
    async fn find_by_id(&self, id: Id) -> Result<Option<Device>, PersistenceError> {
        Ok(self.devices.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str, tenant_id: Id) -> Result<Option<Device>, PersistenceError> {
        Ok(self
            .devices
            .iter()
            .find(|d| d.code == code && d.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_light_capable(&self, tenant_id: Option<Id>) -> Result<Vec<Device>, PersistenceError> {
        if self.broken {
            return Err(PersistenceError::Database(sqlx::Error::PoolClosed));
        }

        Ok(self
            .devices
            .iter()
            .filter(|d| d.kind().is_light_capable() && !d.is_deleted())
            .filter(|d| tenant_id.is_none_or(|t| d.tenant_id == t))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryReadingStore {
    pub readings: Mutex<Vec<Reading>>,
}

impl MemoryReadingStore {
    pub fn len(&self) -> usize {
        self.readings.lock().unwrap().len()
    }

    fn newest_first(&self, keep: impl Fn(&Reading) -> bool) -> Vec<Reading> {
        let mut readings: Vec<Reading> = self
            .readings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| keep(*r))
            .cloned()
            .collect();
        readings.sort_by(|a, b| {
            (b.timestamp, b.created_at, b.id).cmp(&(a.timestamp, a.created_at, a.id))
        });
        readings
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn append(&self, reading: &Reading) -> Result<Reading, PersistenceError> {
        let mut readings = self.readings.lock().unwrap();
        let stored = Reading {
            id: readings.len() as i64 + 1,
            created_at: OffsetDateTime::now_utc(),
            ..reading.clone()
        };
        readings.push(stored.clone());

        Ok(stored)
    }

    async fn latest(&self, device_id: Id, tenant_id: Id) -> Result<Option<Reading>, PersistenceError> {
        Ok(self
            .newest_first(|r| r.device_id == device_id && r.tenant_id == tenant_id)
            .into_iter()
            .next())
    }

    async fn find_page(
        &self,
        filter: &ReadingFilter,
        page: u32,
        size: u32,
    ) -> Result<(Vec<Reading>, u64), PersistenceError> {
        let matching = self.newest_first(|r| {
            r.tenant_id == filter.tenant_id
                && r.timestamp >= filter.start_time
                && r.timestamp <= filter.end_time
                && filter.device_id.is_none_or(|id| r.device_id == id)
                && filter.data_source.as_ref().is_none_or(|s| &r.data_source == s)
        });
        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip((page * size) as usize)
            .take(size as usize)
            .collect();

        Ok((content, total))
    }

    async fn recent(&self, device_id: Id, limit: u32) -> Result<Vec<Reading>, PersistenceError> {
        let mut readings = self.newest_first(|r| r.device_id == device_id);
        readings.truncate(limit as usize);

        Ok(readings)
    }

    async fn aggregate(
        &self,
        device_id: Id,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
    ) -> Result<ReadingAggregate, PersistenceError> {
        let values: Vec<f64> = self
            .newest_first(|r| {
                r.device_id == device_id && r.timestamp >= start_time && r.timestamp <= end_time
            })
            .iter()
            .map(|r| r.light_value)
            .collect();

        if values.is_empty() {
            return Ok(ReadingAggregate::default());
        }

        Ok(ReadingAggregate {
            count: values.len() as u64,
            avg: Some(values.iter().sum::<f64>() / values.len() as f64),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Value(f64),
    Fail(u16),
    Hang,
}

/// Device source answering from a fixed table keyed by device code.
pub struct ScriptedSource {
    behaviors: HashMap<String, Behavior>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(behaviors: impl IntoIterator<Item = (&'static str, Behavior)>) -> Self {
        Self {
            behaviors: behaviors
                .into_iter()
                .map(|(code, behavior)| (code.to_string(), behavior))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceSource for ScriptedSource {
    async fn fetch(&self, device: &Device) -> Result<FetchedReading, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behaviors.get(&device.code) {
            Some(Behavior::Value(light_value)) => Ok(FetchedReading {
                light_value: *light_value,
                timestamp: None,
                data_source: Some("mock".to_string()),
            }),
            Some(Behavior::Fail(status)) => Err(FetchError::Status(*status)),
            Some(Behavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(FetchError::Transport("hang up".to_string()))
            }
            None => Err(FetchError::Status(404)),
        }
    }
}
