use std::sync::Arc;

use async_trait::async_trait;
use luxtrack_api::Id;
use sqlx::{QueryBuilder, Sqlite};
use time::OffsetDateTime;

use super::{ReadingAggregate, ReadingFilter, ReadingStore};
use crate::configs::Storage;
use crate::errors::PersistenceError;
use crate::models::{Reading, to_unix_millis};

const NEWEST_FIRST: &str = " ORDER BY timestamp DESC, created_at DESC, id DESC";

pub struct ReadingRepository {
    storage: Arc<Storage>,
}

impl ReadingRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ReadingFilter) {
        builder
            .push(" WHERE tenant_id = ")
            .push_bind(filter.tenant_id)
            .push(" AND timestamp >= ")
            .push_bind(to_unix_millis(filter.start_time))
            .push(" AND timestamp <= ")
            .push_bind(to_unix_millis(filter.end_time));

        if let Some(device_id) = filter.device_id {
            builder.push(" AND device_id = ").push_bind(device_id);
        }

        if let Some(data_source) = &filter.data_source {
            builder.push(" AND data_source = ").push_bind(data_source.clone());
        }
    }
}

#[async_trait]
impl ReadingStore for ReadingRepository {
    async fn append(&self, reading: &Reading) -> Result<Reading, PersistenceError> {
        let created: Reading = sqlx::query_as(
            r#"
            INSERT INTO light_readings (device_id, tenant_id, light_value, timestamp, data_source, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(reading.device_id)
        .bind(reading.tenant_id)
        .bind(reading.light_value)
        .bind(to_unix_millis(reading.timestamp))
        .bind(&reading.data_source)
        .bind(&reading.metadata)
        .bind(to_unix_millis(OffsetDateTime::now_utc()))
        .fetch_one(self.storage.get_pool())
        .await?;

        Ok(created)
    }

    async fn latest(&self, device_id: Id, tenant_id: Id) -> Result<Option<Reading>, PersistenceError> {
        let reading: Option<Reading> = sqlx::query_as(&format!(
            "SELECT * FROM light_readings WHERE device_id = $1 AND tenant_id = $2{NEWEST_FIRST} LIMIT 1"
        ))
        .bind(device_id)
        .bind(tenant_id)
        .fetch_optional(self.storage.get_pool())
        .await?;

        Ok(reading)
    }

    async fn find_page(
        &self,
        filter: &ReadingFilter,
        page: u32,
        size: u32,
    ) -> Result<(Vec<Reading>, u64), PersistenceError> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM light_readings");
        Self::push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.storage.get_pool())
            .await?;

        let mut page_query = QueryBuilder::<Sqlite>::new("SELECT * FROM light_readings");
        Self::push_filter(&mut page_query, filter);
        page_query
            .push(NEWEST_FIRST)
            .push(" LIMIT ")
            .push_bind(size as i64)
            .push(" OFFSET ")
            .push_bind(page as i64 * size as i64);
        let readings: Vec<Reading> = page_query
            .build_query_as()
            .fetch_all(self.storage.get_pool())
            .await?;

        Ok((readings, total as u64))
    }

    async fn recent(&self, device_id: Id, limit: u32) -> Result<Vec<Reading>, PersistenceError> {
        let readings: Vec<Reading> = sqlx::query_as(&format!(
            "SELECT * FROM light_readings WHERE device_id = $1{NEWEST_FIRST} LIMIT $2"
        ))
        .bind(device_id)
        .bind(limit as i64)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(readings)
    }

    async fn aggregate(
        &self,
        device_id: Id,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
    ) -> Result<ReadingAggregate, PersistenceError> {
        let (count, avg, min, max): (i64, Option<f64>, Option<f64>, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), AVG(light_value), MIN(light_value), MAX(light_value)
            FROM light_readings
            WHERE device_id = $1 AND timestamp >= $2 AND timestamp <= $3
            "#,
        )
        .bind(device_id)
        .bind(to_unix_millis(start_time))
        .bind(to_unix_millis(end_time))
        .fetch_one(self.storage.get_pool())
        .await?;

        Ok(ReadingAggregate {
            count: count as u64,
            avg,
            min,
            max,
        })
    }
}
