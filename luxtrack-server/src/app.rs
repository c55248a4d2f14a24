use std::sync::Arc;

use axum::Router;
use luxtrack_api::DeviceStatus;
use time::OffsetDateTime;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{DeviceSeed, SchemaManager, Settings, Storage};
use crate::handles::{ReadingState, docs_router, reading_router};
use crate::models::Device;
use crate::repositories::{DeviceRepository, ReadingRepository};
use crate::services::{
    CollectionScheduler, CollectionWorker, HttpDeviceSource, QueryService, StatisticsService,
};

pub struct App {
    pub router: Router,
    pub scheduler: Arc<CollectionScheduler>,
}

pub async fn create_app(settings: &Arc<Settings>) -> anyhow::Result<App> {
    let storage = Arc::new(Storage::new(settings.database.clone(), SchemaManager::default()).await?);

    let device_repository = Arc::new(DeviceRepository::new(storage.clone()));
    let reading_repository = Arc::new(ReadingRepository::new(storage.clone()));

    seed_devices(&device_repository, &settings.devices).await?;

    let device_source = Arc::new(HttpDeviceSource::new(&settings.device_api)?);
    let collection_worker = Arc::new(CollectionWorker::new(
        device_repository.clone(),
        reading_repository.clone(),
        device_source,
        settings.collection.fetch_timeout(),
    ));
    let scheduler = Arc::new(CollectionScheduler::new(
        device_repository.clone(),
        collection_worker.clone(),
        &settings.collection,
    ));

    let reading_state = ReadingState {
        query_service: Arc::new(QueryService::new(
            device_repository.clone(),
            reading_repository.clone(),
        )),
        statistics_service: Arc::new(StatisticsService::new(
            device_repository.clone(),
            reading_repository.clone(),
        )),
        collection_worker,
    };

    let router = Router::new()
        .merge(reading_router(reading_state))
        .merge(docs_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(App { router, scheduler })
}

/// Registers the configured devices whose code is not known yet.
pub async fn seed_devices(repository: &DeviceRepository, seeds: &[DeviceSeed]) -> Result<(), sqlx::Error> {
    let mut tx = repository.get_pool().begin().await?;

    for seed in seeds {
        let known = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM devices WHERE code = $1)",
        )
        .bind(&seed.code)
        .fetch_one(&mut *tx)
        .await?;

        if known {
            continue;
        }

        let device = Device {
            id: 0,
            tenant_id: seed.tenant_id,
            code: seed.code.clone(),
            name: seed.name.clone(),
            device_type: seed.device_type.to_string(),
            status: DeviceStatus::Online.to_string(),
            created_at: OffsetDateTime::now_utc(),
            deleted_at: None,
        };
        let id = repository.create(&device, &mut tx).await?;

        tracing::info!(device_code = %seed.code, "registered device {}", id);
    }

    tx.commit().await?;

    Ok(())
}
