use luxtrack_api::Id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use time::OffsetDateTime;

use super::Table;

/// One illumination sample. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub device_id: Id,
    pub tenant_id: Id,
    /// Illumination in lux
    pub light_value: f64,
    /// Acquisition time
    pub timestamp: OffsetDateTime,
    pub data_source: String,
    pub metadata: Option<Value>,
    /// Write time, assigned by the store
    pub created_at: OffsetDateTime,
}

/// Times are stored as unix milliseconds so that range filters and ordering
/// compare numbers rather than text.
pub(crate) fn to_unix_millis(time: OffsetDateTime) -> i64 {
    (time.unix_timestamp_nanos() / 1_000_000) as i64
}

pub(crate) fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, sqlx::Error> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl<'r> FromRow<'r, SqliteRow> for Reading {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            device_id: row.try_get("device_id")?,
            tenant_id: row.try_get("tenant_id")?,
            light_value: row.try_get("light_value")?,
            timestamp: from_unix_millis(row.try_get("timestamp")?)?,
            data_source: row.try_get("data_source")?,
            metadata: row.try_get("metadata")?,
            created_at: from_unix_millis(row.try_get("created_at")?)?,
        })
    }
}

#[derive(Clone)]
pub struct ReadingTable;

impl Table for ReadingTable {
    fn name(&self) -> &'static str {
        "light_readings"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS light_readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id INTEGER NOT NULL,
                tenant_id INTEGER NOT NULL,
                light_value REAL NOT NULL,
                timestamp INTEGER NOT NULL,
                data_source VARCHAR(50) NOT NULL,
                metadata JSON,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (device_id) REFERENCES devices (id)
            );
            CREATE INDEX IF NOT EXISTS idx_light_readings_device_id ON light_readings (device_id, timestamp);
            CREATE INDEX IF NOT EXISTS idx_light_readings_timestamp ON light_readings (timestamp);
            CREATE INDEX IF NOT EXISTS idx_light_readings_tenant_id ON light_readings (tenant_id, timestamp);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS light_readings;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["devices"]
    }
}
