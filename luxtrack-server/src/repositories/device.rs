use std::sync::Arc;

use async_trait::async_trait;
use luxtrack_api::{DeviceType, Id};
use sqlx::{Sqlite, SqlitePool, Transaction};
use time::OffsetDateTime;

use super::DeviceRegistry;
use crate::configs::Storage;
use crate::errors::PersistenceError;
use crate::models::Device;

pub struct DeviceRepository {
    storage: Arc<Storage>,
}

impl DeviceRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &SqlitePool {
        self.storage.get_pool()
    }
}

impl DeviceRepository {
    pub async fn create(
        &self,
        item: &Device,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<Id, sqlx::Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO devices (tenant_id, code, name, device_type, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.tenant_id)
        .bind(&item.code)
        .bind(&item.name)
        .bind(&item.device_type)
        .bind(&item.status)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id as Id)
    }

    pub async fn soft_delete(
        &self,
        id: Id,
        deleted_at: OffsetDateTime,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE devices SET deleted_at = $1 WHERE id = $2")
            .bind(deleted_at)
            .bind(id)
            .execute(&mut **transaction)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl DeviceRegistry for DeviceRepository {
    async fn find_by_id(&self, id: Id) -> Result<Option<Device>, PersistenceError> {
        let device: Option<Device> = sqlx::query_as("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(device)
    }

    async fn find_by_code(&self, code: &str, tenant_id: Id) -> Result<Option<Device>, PersistenceError> {
        let device: Option<Device> =
            sqlx::query_as("SELECT * FROM devices WHERE code = $1 AND tenant_id = $2")
                .bind(code)
                .bind(tenant_id)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(device)
    }

    async fn find_light_capable(&self, tenant_id: Option<Id>) -> Result<Vec<Device>, PersistenceError> {
        let devices: Vec<Device> = sqlx::query_as(
            r#"
            SELECT * FROM devices
            WHERE device_type = $1
              AND deleted_at IS NULL
              AND ($2 IS NULL OR tenant_id = $2)
            ORDER BY id
            "#,
        )
        .bind(DeviceType::LightSensor.as_str())
        .bind(tenant_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(devices)
    }
}
