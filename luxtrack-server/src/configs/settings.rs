use std::env;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use luxtrack_api::{DeviceType, Id};
use serde::{Deserialize, Serialize};

use crate::configs::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub migration_path: Option<String>,
    pub clean_start: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Run the periodic collection job
    pub enabled: bool,
    /// Seconds between two collection cycles
    pub interval_secs: u64,
    /// Upper bound for a single device fetch
    pub fetch_timeout_ms: u64,
    /// Devices collected at the same time within a cycle
    pub concurrency: usize,
    /// Restrict scheduled collection to one tenant
    pub tenant_id: Option<Id>,
}

impl Collection {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 3600,
            fetch_timeout_ms: 5000,
            concurrency: 1,
            tenant_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceApi {
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Device registered on start when its code is not known yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSeed {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub tenant_id: Id,
    pub device_type: DeviceType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    #[serde(default)]
    pub collection: Collection,
    pub device_api: DeviceApi,
    #[serde(default)]
    pub devices: Vec<DeviceSeed>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let mut settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("LUXTRACK").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(migrate) = &settings.database.migration_path {
            if Path::new(migrate).is_dir() {
                let migrate_path = normalize_path(migrate)
                    .map_err(|e| ConfigError::Message(e.to_string()))?
                    .to_string_lossy()
                    .to_string();

                settings.database.migration_path = Some(migrate_path);
            } else {
                settings.database.migration_path = None;
            }
        }

        if settings.collection.concurrency == 0 {
            return Err(ConfigError::Message(
                "collection.concurrency must be at least 1".to_string(),
            ));
        }

        Ok(settings)
    }
}
