use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use luxtrack_api::{DeviceStatus, DeviceType, Id};
use luxtrack_mock::emulator::Emulator;
use luxtrack_mock::simulate::IlluminationModel;
use luxtrack_server::configs::{Collection, Database, DeviceApi, SchemaManager, Storage};
use luxtrack_server::handles::{ReadingState, reading_router};
use luxtrack_server::models::{Device, Reading};
use luxtrack_server::repositories::{DeviceRepository, ReadingRepository, ReadingStore};
use luxtrack_server::services::{
    CollectionScheduler, CollectionWorker, DeviceSource, HttpDeviceSource, QueryService,
    StatisticsService,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub device_repository: Arc<DeviceRepository>,
    pub reading_repository: Arc<ReadingRepository>,
    pub worker: Arc<CollectionWorker>,
    pub scheduler: Arc<CollectionScheduler>,
    pub router: Router,
}

impl MockApp {
    /// App collecting from a device API that nothing listens on.
    pub async fn new() -> Self {
        Self::with_device_api("http://127.0.0.1:9/mock/bc4").await
    }

    pub async fn with_device_api(base_url: &str) -> Self {
        let source = HttpDeviceSource::new(&DeviceApi {
            base_url: base_url.to_string(),
            timeout_ms: 2000,
        })
        .unwrap();

        Self::with_source(Arc::new(source)).await
    }

    pub async fn with_source(source: Arc<dyn DeviceSource>) -> Self {
        let storage = Arc::new(
            Storage::new(
                Database {
                    migration_path: None,
                    clean_start: true,
                    url: String::from("sqlite::memory:"),
                },
                SchemaManager::default(),
            )
            .await
            .unwrap(),
        );

        let device_repository = Arc::new(DeviceRepository::new(storage.clone()));
        let reading_repository = Arc::new(ReadingRepository::new(storage.clone()));
        let collection = Collection::default();

        let worker = Arc::new(CollectionWorker::new(
            device_repository.clone(),
            reading_repository.clone(),
            source,
            collection.fetch_timeout(),
        ));
        let scheduler = Arc::new(CollectionScheduler::new(
            device_repository.clone(),
            worker.clone(),
            &collection,
        ));

        let router = reading_router(ReadingState {
            query_service: Arc::new(QueryService::new(
                device_repository.clone(),
                reading_repository.clone(),
            )),
            statistics_service: Arc::new(StatisticsService::new(
                device_repository.clone(),
                reading_repository.clone(),
            )),
            collection_worker: worker.clone(),
        });

        Self {
            storage,
            device_repository,
            reading_repository,
            worker,
            scheduler,
            router,
        }
    }

    pub async fn create_test_device(&self, code: &str, tenant_id: Id) -> Device {
        let device = Device {
            id: 0,
            tenant_id,
            code: code.to_string(),
            name: format!("Light sensor {code}"),
            device_type: DeviceType::LightSensor.to_string(),
            status: DeviceStatus::Online.to_string(),
            created_at: OffsetDateTime::now_utc(),
            deleted_at: None,
        };

        let mut tx = self.storage.get_pool().begin().await.unwrap();
        let id = self.device_repository.create(&device, &mut tx).await.unwrap();
        tx.commit().await.unwrap();

        Device { id, ..device }
    }

    pub async fn create_test_reading(&self, device: &Device, light_value: f64, timestamp: OffsetDateTime) -> Reading {
        self.reading_repository
            .append(&Reading {
                id: 0,
                device_id: device.id,
                tenant_id: device.tenant_id,
                light_value,
                timestamp,
                data_source: "mock".to_string(),
                metadata: None,
                created_at: timestamp,
            })
            .await
            .unwrap()
    }

    pub async fn count_readings(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM light_readings")
            .fetch_one(self.storage.get_pool())
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .method(Method::POST)
            .header("Content-Type", "application/json");

        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }
}

/// Serves the device emulator on a local port and returns its base url.
pub async fn spawn_emulator() -> String {
    let emulator = Arc::new(Emulator::new(
        IlluminationModel::default(),
        StdRng::seed_from_u64(42),
        0..=0,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, luxtrack_mock::create_app(emulator))
            .await
            .unwrap();
    });

    format!("http://{address}/mock/bc4")
}

/// Query string form of a time.
pub fn rfc3339(time: OffsetDateTime) -> String {
    time.format(&time::format_description::well_known::Rfc3339)
        .unwrap()
}
