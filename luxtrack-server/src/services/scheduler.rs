use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use luxtrack_api::Id;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use super::CollectionWorker;
use crate::configs::Collection;
use crate::errors::CollectionFailure;
use crate::repositories::DeviceRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Outcome of one collection cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Devices attempted
    pub devices: usize,
    pub succeeded: usize,
    pub failures: Vec<CollectionFailure>,
}

/// Periodic collection over every light-capable device.
pub struct CollectionScheduler {
    devices: Arc<dyn DeviceRegistry>,
    worker: Arc<CollectionWorker>,
    period: Duration,
    concurrency: usize,
    tenant_id: Option<Id>,
    state: watch::Sender<SchedulerState>,
}

/// Handle to a started scheduler loop.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the loop and waits for it. A cycle in progress runs to its end.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);

        if let Err(e) = self.task.await {
            tracing::error!("Collection scheduler terminated abnormally: {}", e);
        }
    }
}

impl CollectionScheduler {
    pub fn new(
        devices: Arc<dyn DeviceRegistry>,
        worker: Arc<CollectionWorker>,
        collection: &Collection,
    ) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);

        Self {
            devices,
            worker,
            period: collection.interval(),
            concurrency: collection.concurrency.max(1),
            tenant_id: collection.tenant_id,
            state,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Collects every light-capable device once. Failures are isolated per device.
    pub async fn run_cycle(&self) -> CycleReport {
        self.state.send_replace(SchedulerState::Running);
        let report = self.collect_all().await;
        self.state.send_replace(SchedulerState::Idle);

        report
    }

    async fn collect_all(&self) -> CycleReport {
        let devices = match self.devices.find_light_capable(self.tenant_id).await {
            Ok(devices) => devices,
            Err(e) => {
                tracing::error!("Failed to load light sensor devices: {}", e);
                return CycleReport::default();
            }
        };

        if devices.is_empty() {
            tracing::debug!("No light sensor devices to collect");
            return CycleReport::default();
        }

        tracing::debug!("Collecting light readings from {} devices", devices.len());

        let results: Vec<_> = stream::iter(devices.clone())
            .map(|device| {
                let worker = self.worker.clone();
                async move { worker.collect(&device).await }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = CycleReport {
            devices: devices.len(),
            ..Default::default()
        };

        for result in results {
            match result {
                Ok(_) => report.succeeded += 1,
                Err(failure) => {
                    tracing::error!(device_code = %failure.device_code, "{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        tracing::info!(
            "Light collection cycle finished: {} of {} devices succeeded",
            report.succeeded,
            report.devices
        );

        report
    }

    /// Spawns the periodic loop. The first cycle runs immediately.
    pub fn start(self: &Arc<Self>) -> SchedulerHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let scheduler = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = interval(scheduler.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!("Collection scheduler started, period {:?}", scheduler.period);

            loop {
                // Shutdown wins over a tick that fell due during the last cycle
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        break;
                    }
                    _ = ticker.tick() => {
                        scheduler.run_cycle().await;
                    }
                }
            }

            tracing::info!("Collection scheduler stopped");
        });

        SchedulerHandle { shutdown, task }
    }
}
