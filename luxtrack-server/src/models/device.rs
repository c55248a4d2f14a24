use luxtrack_api::{DeviceStatus, DeviceType, Id};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    pub id: Id,
    pub tenant_id: Id,
    /// Unique device code, also the device's address on the device API
    pub code: String,
    pub name: String,
    pub device_type: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    /// Soft delete marker
    pub deleted_at: Option<OffsetDateTime>,
}

impl Device {
    pub fn kind(&self) -> DeviceType {
        self.device_type.clone().into()
    }

    pub fn status(&self) -> DeviceStatus {
        self.status.clone().into()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Clone)]
pub struct DeviceTable;

impl Table for DeviceTable {
    fn name(&self) -> &'static str {
        "devices"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS devices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tenant_id INTEGER NOT NULL DEFAULT 0,
                code VARCHAR(100) NOT NULL UNIQUE,
                name VARCHAR(255) NOT NULL,
                device_type VARCHAR(50) NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'offline',
                created_at TIMESTAMP NOT NULL,
                deleted_at TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_devices_tenant_id ON devices (tenant_id);
            CREATE INDEX IF NOT EXISTS idx_devices_device_type ON devices (device_type);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS devices;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}
