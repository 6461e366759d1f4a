//! Fan-out of file tasks onto a bounded worker pool

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::parser::{parse_records, MalformedInput};
use super::types::{BatchSummary, FileOutcome, IngestFile};
use crate::store::{NewCargo, Store, StoreError};

/// Default grace period for draining in-flight file tasks at teardown.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// One worker per available core, falling back to a single worker when the
/// host parallelism cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Errors that abort one file's task. Sibling files are unaffected; the
/// coordinator logs the error and counts the file as contributing nothing.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Malformed(#[from] MalformedInput),

    #[error("failed to persist cargo '{description}': {source}")]
    Persistence {
        description: String,
        #[source]
        source: StoreError,
    },

    #[error("worker pool is no longer accepting tasks")]
    WorkerPool,
}

/// Runs ingestion batches on a worker pool of fixed size.
///
/// The pool size is decided once at construction and holds for the life of
/// the coordinator. Each call to [`ingest`](Self::ingest) spawns exactly
/// one task per file; the pool bound limits how many run at once.
pub struct IngestionCoordinator {
    store: Arc<dyn Store>,
    workers: usize,
    shutdown_grace: Duration,
}

impl IngestionCoordinator {
    /// `workers` is clamped to at least one. Pass [`default_workers`] for
    /// one worker per core.
    pub fn new(store: Arc<dyn Store>, workers: usize, shutdown_grace: Duration) -> Self {
        Self {
            store,
            workers: workers.max(1),
            shutdown_grace,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process one batch of files and return the combined summary.
    ///
    /// File tasks run concurrently in no particular order; results are
    /// folded as they complete, which is sound because
    /// [`FileOutcome::combine`] is associative and commutative. A task
    /// that fails or panics is logged and contributes zero to the totals.
    /// The batch itself never fails.
    #[tracing::instrument(skip(self, files), fields(files = files.len(), workers = self.workers))]
    pub async fn ingest(&self, files: Vec<IngestFile>) -> BatchSummary {
        let limiter = Arc::new(Semaphore::new(self.workers));
        let mut tasks: JoinSet<(String, Result<FileOutcome, IngestError>)> = JoinSet::new();

        for file in files {
            let store = Arc::clone(&self.store);
            let limiter = Arc::clone(&limiter);
            tasks.spawn(async move {
                // Fails only if the semaphore is closed, which this
                // coordinator never does.
                let _permit = match limiter.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (file.name, Err(IngestError::WorkerPool)),
                };
                let result = process_file(store.as_ref(), &file).await;
                (file.name, result)
            });
        }

        let mut total = FileOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(outcome))) => {
                    info!(
                        file = %name,
                        succeeded = outcome.succeeded,
                        failed = outcome.failed,
                        "file processed"
                    );
                    total = total.combine(outcome);
                },
                Ok((name, Err(e))) => {
                    error!(file = %name, error = %e, "file task failed; batch continues");
                },
                Err(join_error) => {
                    error!(error = %join_error, "file task panicked or was cancelled; batch continues");
                },
            }
        }

        shutdown_pool(&mut tasks, self.shutdown_grace).await;

        BatchSummary::from(total)
    }
}

/// Process all records of one file against the store.
///
/// A record whose vehicle number resolves is persisted and counted as a
/// success. An unresolved number or a business-rule violation is counted
/// as a failure and the file continues. A store error is fatal for the
/// file: remaining records are abandoned and the error propagates to the
/// coordinator.
async fn process_file(store: &dyn Store, file: &IngestFile) -> Result<FileOutcome, IngestError> {
    let records = parse_records(&file.contents)?;
    let mut outcome = FileOutcome::default();

    for record in records {
        if let Err(reason) = record.validate() {
            warn!(file = %file.name, cargo = %record.description, %reason, "cargo record rejected");
            outcome.failed += 1;
            continue;
        }

        let vehicle = store
            .vehicle_by_number(&record.vehicle_number)
            .await
            .map_err(|source| IngestError::Persistence {
                description: record.description.clone(),
                source,
            })?;

        match vehicle {
            Some(vehicle) => {
                store
                    .save_cargo(NewCargo {
                        vehicle_id: vehicle.id,
                        description: record.description.clone(),
                        weight: record.weight,
                        status: record.status,
                    })
                    .await
                    .map_err(|source| IngestError::Persistence {
                        description: record.description.clone(),
                        source,
                    })?;
                outcome.succeeded += 1;
            },
            None => {
                warn!(
                    file = %file.name,
                    cargo = %record.description,
                    vehicle_number = %record.vehicle_number,
                    "no vehicle with this number; cargo not imported"
                );
                outcome.failed += 1;
            },
        }
    }

    Ok(outcome)
}

/// Release the pool deterministically.
///
/// Waits up to `grace` for remaining tasks, cancels whatever is left, then
/// waits the same period again. A pool that still has not converged is
/// reported in the log; this function never fails.
async fn shutdown_pool<T: 'static>(tasks: &mut JoinSet<T>, grace: Duration) {
    if tasks.is_empty() {
        return;
    }

    if timeout(grace, drain(tasks)).await.is_ok() {
        return;
    }

    warn!(
        remaining = tasks.len(),
        grace_secs = grace.as_secs(),
        "file tasks still running after grace period; cancelling"
    );
    tasks.abort_all();

    if timeout(grace, drain(tasks)).await.is_err() {
        error!(
            remaining = tasks.len(),
            "worker pool did not shut down after forced cancellation"
        );
    }
}

async fn drain<T: 'static>(tasks: &mut JoinSet<T>) {
    while tasks.join_next().await.is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Vehicle, VehicleType};
    use crate::store::memory::MemoryStore;
    use crate::store::NewVehicle;

    fn coordinator(store: Arc<dyn Store>) -> IngestionCoordinator {
        IngestionCoordinator::new(store, 4, Duration::from_millis(200))
    }

    #[test]
    fn test_worker_count_is_clamped_to_one() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        assert_eq!(IngestionCoordinator::new(store, 0, DEFAULT_SHUTDOWN_GRACE).workers(), 1);
    }

    #[test]
    fn test_default_workers_is_at_least_one() {
        assert!(default_workers() >= 1);
    }

    #[tokio::test]
    async fn test_ingest_counts_unresolved_vehicles_as_failures() {
        let store = Arc::new(MemoryStore::new());
        let file = IngestFile::new(
            "cargo.json",
            br#"[{"description": "bricks", "weight": 900.0, "status": "PENDING", "vehicleNumber": "ZZ9999ZZ"}]"#
                .to_vec(),
        );

        let summary = coordinator(store).ingest(vec![file]).await;
        assert_eq!(summary.successful_imports, 0);
        assert_eq!(summary.failed_imports, 1);
    }

    #[tokio::test]
    async fn test_malformed_file_contributes_nothing() {
        let store = Arc::new(MemoryStore::new());
        seed_vehicle(store.as_ref(), "AA1111AA").await;

        let good = IngestFile::new(
            "good.json",
            br#"[{"description": "sand", "weight": 20.0, "status": "PENDING", "vehicleNumber": "AA1111AA"}]"#
                .to_vec(),
        );
        let malformed = IngestFile::new("broken.json", b"[{\"description\": ".to_vec());

        let summary = coordinator(store).ingest(vec![good, malformed]).await;
        assert_eq!(summary.successful_imports, 1);
        assert_eq!(summary.failed_imports, 0);
    }

    #[tokio::test]
    async fn test_panicking_store_does_not_crash_the_batch() {
        struct PanickingStore;

        #[async_trait::async_trait]
        impl Store for PanickingStore {
            async fn ping(&self) -> Result<(), StoreError> {
                unimplemented!("test store")
            }
            async fn save_cargo(&self, _new: NewCargo) -> Result<crate::domain::Cargo, StoreError> {
                unimplemented!("test store")
            }
            async fn cargo_by_id(
                &self,
                _id: i64,
            ) -> Result<Option<crate::store::CargoWithVehicle>, StoreError> {
                unimplemented!("test store")
            }
            async fn update_cargo(
                &self,
                _id: i64,
                _changes: NewCargo,
            ) -> Result<Option<crate::domain::Cargo>, StoreError> {
                unimplemented!("test store")
            }
            async fn delete_cargo(&self, _id: i64) -> Result<bool, StoreError> {
                unimplemented!("test store")
            }
            async fn search_cargos(
                &self,
                _predicate: &crate::filter::Predicate,
                _limit: i64,
                _offset: i64,
            ) -> Result<Vec<crate::store::CargoWithVehicle>, StoreError> {
                unimplemented!("test store")
            }
            async fn cargos_matching(
                &self,
                _predicate: &crate::filter::Predicate,
            ) -> Result<Vec<crate::store::CargoWithVehicle>, StoreError> {
                unimplemented!("test store")
            }
            async fn count_cargos(
                &self,
                _predicate: &crate::filter::Predicate,
            ) -> Result<i64, StoreError> {
                unimplemented!("test store")
            }
            async fn save_vehicle(&self, _new: NewVehicle) -> Result<Vehicle, StoreError> {
                unimplemented!("test store")
            }
            async fn vehicle_by_id(&self, _id: i64) -> Result<Option<Vehicle>, StoreError> {
                unimplemented!("test store")
            }
            async fn vehicle_by_number(&self, _number: &str) -> Result<Option<Vehicle>, StoreError> {
                unimplemented!("test store")
            }
            async fn list_vehicles(
                &self,
                _limit: i64,
                _offset: i64,
            ) -> Result<Vec<crate::store::VehicleWithCargos>, StoreError> {
                unimplemented!("test store")
            }
            async fn count_vehicles(&self) -> Result<i64, StoreError> {
                unimplemented!("test store")
            }
            async fn update_vehicle(
                &self,
                _id: i64,
                _changes: NewVehicle,
            ) -> Result<Option<Vehicle>, StoreError> {
                unimplemented!("test store")
            }
            async fn delete_vehicle(&self, _id: i64) -> Result<bool, StoreError> {
                unimplemented!("test store")
            }
        }

        let file = IngestFile::new(
            "cargo.json",
            br#"[{"description": "bricks", "weight": 1.0, "status": "PENDING", "vehicleNumber": "AA1111AA"}]"#
                .to_vec(),
        );

        let summary = coordinator(Arc::new(PanickingStore)).ingest(vec![file.clone(), file]).await;
        assert_eq!(summary.successful_imports, 0);
        assert_eq!(summary.failed_imports, 0);
    }

    #[tokio::test]
    async fn test_shutdown_pool_is_quick_when_drained() {
        let mut tasks: JoinSet<()> = JoinSet::new();
        let started = std::time::Instant::now();
        shutdown_pool(&mut tasks, Duration::from_secs(10)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_shutdown_pool_waits_for_tasks_within_grace() {
        let mut tasks: JoinSet<()> = JoinSet::new();
        tasks.spawn(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
        });

        shutdown_pool(&mut tasks, Duration::from_secs(5)).await;
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_pool_cancels_stragglers_after_grace() {
        let mut tasks: JoinSet<()> = JoinSet::new();
        for _ in 0..3 {
            tasks.spawn(async {
                tokio::time::sleep(Duration::from_secs(600)).await;
            });
        }

        let started = std::time::Instant::now();
        shutdown_pool(&mut tasks, Duration::from_millis(50)).await;

        assert!(tasks.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    async fn seed_vehicle(store: &dyn Store, number: &str) -> Vehicle {
        store
            .save_vehicle(NewVehicle {
                vehicle_type: VehicleType::Truck,
                vehicle_number: number.to_string(),
                route_from: "Kyiv".to_string(),
                route_to: "Dnipro".to_string(),
            })
            .await
            .unwrap()
    }
}
