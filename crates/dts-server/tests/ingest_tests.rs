//! Integration tests for the bulk ingestion pipeline
//!
//! These tests run the coordinator end to end over the in-memory store:
//! files are parsed, each record is validated and resolved to a vehicle,
//! and the per-file outcomes combine into one batch summary.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use dts_server::domain::VehicleType;
use dts_server::filter::Predicate;
use dts_server::ingest::{BatchSummary, IngestFile, IngestionCoordinator};
use dts_server::store::{memory::MemoryStore, NewVehicle, Store};

const KNOWN_VEHICLES: [&str; 2] = ["AA1111AA", "BB2222BB"];

fn record(vehicle_number: &str, description: &str, weight: f64) -> Value {
    json!({
        "description": description,
        "weight": weight,
        "status": "IN_TRANSIT",
        "vehicleNumber": vehicle_number
    })
}

fn file_of(name: &str, records: &[Value]) -> IngestFile {
    let contents = serde_json::to_vec(records).expect("records should serialize");
    IngestFile::new(name, contents)
}

/// Seed the known vehicles and run one batch with the given worker count
async fn run_batch(files: Vec<IngestFile>, workers: usize) -> (BatchSummary, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    for number in KNOWN_VEHICLES {
        store
            .save_vehicle(NewVehicle {
                vehicle_type: VehicleType::Truck,
                vehicle_number: number.to_string(),
                route_from: "Odesa".to_string(),
                route_to: "Kyiv".to_string(),
            })
            .await
            .expect("Failed to seed vehicle");
    }

    let shared: Arc<dyn Store> = store.clone();
    let coordinator = IngestionCoordinator::new(shared, workers, Duration::from_secs(5));
    let summary = coordinator.ingest(files).await;

    (summary, store)
}

async fn stored_cargo_count(store: &MemoryStore) -> usize {
    store
        .cargos_matching(&Predicate::All)
        .await
        .expect("store should answer")
        .len()
}

#[tokio::test]
async fn test_mixed_batch_accounts_per_record() {
    let mut records = Vec::new();
    for i in 0..10 {
        let number = KNOWN_VEHICLES[i % KNOWN_VEHICLES.len()];
        records.push(record(number, &format!("crate {i}"), 100.0 + i as f64));
    }
    records.push(record("ZZ9999ZZ", "orphan one", 10.0));
    records.push(record("ZZ9998ZZ", "orphan two", 11.0));

    let files = vec![
        file_of("bulk.json", &records),
        IngestFile::new("broken.json", b"{ not an array".to_vec()),
    ];

    let (summary, store) = run_batch(files, 4).await;

    // Orphans count as failures; the malformed file contributes nothing.
    assert_eq!(summary.successful_imports, 10);
    assert_eq!(summary.failed_imports, 2);
    assert_eq!(stored_cargo_count(&store).await, 10);
}

#[tokio::test]
async fn test_file_order_does_not_change_totals() {
    let files = || {
        vec![
            file_of(
                "a.json",
                &[
                    record(KNOWN_VEHICLES[0], "coils", 100.0),
                    record(KNOWN_VEHICLES[0], "timber", 200.0),
                    record(KNOWN_VEHICLES[1], "gravel", 300.0),
                    record(KNOWN_VEHICLES[1], "sand", 400.0),
                ],
            ),
            file_of(
                "b.json",
                &[
                    record(KNOWN_VEHICLES[0], "pipes", 500.0),
                    record(KNOWN_VEHICLES[1], "cement", 600.0),
                    record(KNOWN_VEHICLES[1], "glass", 700.0),
                    record("XX0000XX", "stray", 1.0),
                ],
            ),
            IngestFile::new("c.json", b"[{\"truncated\":".to_vec()),
        ]
    };

    let (forward, _) = run_batch(files(), 2).await;
    let (reversed, _) = run_batch(files().into_iter().rev().collect(), 2).await;

    assert_eq!(forward, reversed);
    assert_eq!(forward.successful_imports, 7);
    assert_eq!(forward.failed_imports, 1);
}

#[tokio::test]
async fn test_every_record_in_parseable_files_is_counted_once() {
    let records = vec![
        record(KNOWN_VEHICLES[0], "coils", 100.0),
        record(KNOWN_VEHICLES[0], "timber", 200.0),
        record(KNOWN_VEHICLES[1], "gravel", 300.0),
        record(KNOWN_VEHICLES[1], "sand", 400.0),
        record(KNOWN_VEHICLES[0], "pipes", 500.0),
        // Rejected by validation
        record(KNOWN_VEHICLES[0], "antigravel", -5.0),
        record(KNOWN_VEHICLES[1], "", 7.0),
        // Unresolved vehicle
        record("XX0000XX", "stray", 1.0),
    ];

    let (summary, store) = run_batch(vec![file_of("all.json", &records)], 3).await;

    assert_eq!(
        summary.successful_imports + summary.failed_imports,
        records.len() as u64
    );
    assert_eq!(summary.successful_imports, 5);
    assert_eq!(summary.failed_imports, 3);
    assert_eq!(stored_cargo_count(&store).await, 5);
}

#[tokio::test]
async fn test_more_files_than_workers_all_complete() {
    let files: Vec<IngestFile> = (0..24)
        .map(|i| {
            let records: Vec<Value> = (0..5)
                .map(|j| {
                    record(
                        KNOWN_VEHICLES[(i + j) % KNOWN_VEHICLES.len()],
                        &format!("file {i} item {j}"),
                        50.0 + j as f64,
                    )
                })
                .collect();
            file_of(&format!("chunk-{i}.json"), &records)
        })
        .collect();

    let (summary, store) = run_batch(files, 2).await;

    assert_eq!(summary.successful_imports, 120);
    assert_eq!(summary.failed_imports, 0);
    assert_eq!(stored_cargo_count(&store).await, 120);
}

#[tokio::test]
async fn test_concurrent_batches_stay_isolated() {
    let small = vec![file_of(
        "small.json",
        &[record(KNOWN_VEHICLES[0], "coils", 100.0)],
    )];
    let large: Vec<IngestFile> = (0..8)
        .map(|i| {
            file_of(
                &format!("large-{i}.json"),
                &[
                    record(KNOWN_VEHICLES[0], &format!("left {i}"), 10.0),
                    record(KNOWN_VEHICLES[1], &format!("right {i}"), 20.0),
                ],
            )
        })
        .collect();

    let (small_run, large_run) =
        futures::future::join(run_batch(small, 2), run_batch(large, 2)).await;

    assert_eq!(small_run.0.successful_imports, 1);
    assert_eq!(large_run.0.successful_imports, 16);
    assert_eq!(stored_cargo_count(&small_run.1).await, 1);
    assert_eq!(stored_cargo_count(&large_run.1).await, 16);
}

#[tokio::test]
async fn test_empty_batch_is_empty_summary() {
    let (summary, store) = run_batch(Vec::new(), 4).await;

    assert_eq!(summary.successful_imports, 0);
    assert_eq!(summary.failed_imports, 0);
    assert!(!summary.accepted());
    assert_eq!(stored_cargo_count(&store).await, 0);
}
