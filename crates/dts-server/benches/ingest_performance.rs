/// Performance benchmarks for the bulk ingestion pipeline
///
/// These benchmarks measure file decoding throughput, filter matching, and
/// full batches running through the coordinator over the in-memory store.
///
/// Run with: cargo bench --bench ingest_performance
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use dts_server::domain::VehicleType;
use dts_server::filter::{FilterBuilder, PredicateRegistry, SearchRequest};
use dts_server::ingest::{parse_records, IngestFile, IngestionCoordinator};
use dts_server::store::{memory::MemoryStore, NewCargo, NewVehicle, Store};

const VEHICLE_NUMBERS: [&str; 4] = ["AA1111AA", "BB2222BB", "CC3333CC", "DD4444DD"];
const STATUSES: [&str; 4] = ["PENDING", "IN_TRANSIT", "OUT_FOR_DELIVERY", "DELIVERED"];

/// Render a JSON cargo file with the given number of records
fn render_file(records: usize) -> Vec<u8> {
    let items: Vec<serde_json::Value> = (0..records)
        .map(|i| {
            serde_json::json!({
                "description": format!("benchmark cargo {i}"),
                "weight": 50.0 + (i % 500) as f64,
                "status": STATUSES[i % STATUSES.len()],
                "vehicleNumber": VEHICLE_NUMBERS[i % VEHICLE_NUMBERS.len()]
            })
        })
        .collect();
    serde_json::to_vec(&items).expect("records should serialize")
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (i, number) in VEHICLE_NUMBERS.iter().enumerate() {
        store
            .save_vehicle(NewVehicle {
                vehicle_type: if i % 2 == 0 {
                    VehicleType::Truck
                } else {
                    VehicleType::Train
                },
                vehicle_number: number.to_string(),
                route_from: "Odesa".to_string(),
                route_to: "Kyiv".to_string(),
            })
            .await
            .expect("Failed to seed vehicle");
    }
    store
}

fn bench_parse_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_records");

    for size in [100, 1_000, 10_000].iter() {
        let contents = render_file(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &contents, |b, contents| {
            b.iter(|| parse_records(black_box(contents)).unwrap());
        });
    }

    group.finish();
}

fn bench_ingest_batch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("ingest_batch");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for files in [4usize, 16, 64].iter() {
        const RECORDS_PER_FILE: usize = 50;
        let batch: Vec<IngestFile> = (0..*files)
            .map(|i| IngestFile::new(format!("bench-{i}.json"), render_file(RECORDS_PER_FILE)))
            .collect();

        group.throughput(Throughput::Elements((files * RECORDS_PER_FILE) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(files), &batch, |b, batch| {
            b.to_async(&rt).iter(|| async {
                // Fresh store per iteration so totals stay comparable
                let store = seeded_store().await;
                let shared: Arc<dyn Store> = store;
                let coordinator =
                    IngestionCoordinator::new(shared, 4, Duration::from_secs(5));
                coordinator.ingest(black_box(batch.clone())).await
            });
        });
    }

    group.finish();
}

fn bench_filter_matching(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let store = rt.block_on(async {
        let store = seeded_store().await;
        let records = parse_records(&render_file(10_000)).expect("bench file should parse");
        for record in records {
            let vehicle = store
                .vehicle_by_number(&record.vehicle_number)
                .await
                .expect("store should answer")
                .expect("vehicle was seeded");
            store
                .save_cargo(NewCargo {
                    vehicle_id: vehicle.id,
                    description: record.description,
                    weight: record.weight,
                    status: record.status,
                })
                .await
                .expect("Failed to seed cargo");
        }
        store
    });

    let registry = PredicateRegistry::with_default_providers();

    let mut request = SearchRequest::new();
    request.add_value("status", "DELIVERED");
    request.add_value("status", "PENDING");
    request.add_value("type", "TRUCK");
    let predicate = FilterBuilder::new(&registry)
        .build(&request)
        .expect("filters should resolve");

    let mut group = c.benchmark_group("filter_matching");
    group.throughput(Throughput::Elements(10_000));

    group.bench_function("status_and_type_over_10k", |b| {
        b.to_async(&rt).iter(|| async {
            store
                .cargos_matching(black_box(&predicate))
                .await
                .unwrap()
                .len()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_records,
    bench_ingest_batch,
    bench_filter_matching
);
criterion_main!(benches);
