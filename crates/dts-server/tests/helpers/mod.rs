//! Test helpers for DTS server integration tests
//!
//! This module provides utilities for:
//! - Assembling the application router over the in-memory store
//! - Seeding vehicles and cargos
//! - Sending JSON and multipart requests through `tower::ServiceExt::oneshot`

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use dts_server::domain::{Cargo, DeliveryStatus, Vehicle, VehicleType};
use dts_server::features::{self, FeatureState};
use dts_server::filter::PredicateRegistry;
use dts_server::ingest::{IngestionCoordinator, ReportWriter};
use dts_server::store::{memory::MemoryStore, NewCargo, NewVehicle, Store};

/// Multipart boundary used by [`upload_request`]. Must not occur in file payloads.
pub const BOUNDARY: &str = "dts-test-boundary-7f93a2";

/// Test application wrapper for integration tests
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    /// Owns the directory the ingestion report is written under
    pub report_dir: TempDir,
}

impl TestApp {
    /// Assemble the API router over a fresh in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let report_dir = tempfile::tempdir().expect("Failed to create report directory");

        let shared: Arc<dyn Store> = store.clone();
        let coordinator = IngestionCoordinator::new(shared.clone(), 4, Duration::from_secs(5));

        let state = FeatureState {
            store: shared,
            coordinator: Arc::new(coordinator),
            report: Arc::new(ReportWriter::new(report_dir.path())),
            filters: Arc::new(PredicateRegistry::with_default_providers()),
        };

        let router = Router::new().nest("/api/v1", features::router(state));

        Self {
            router,
            store,
            report_dir,
        }
    }

    /// Path of the ingestion report artifact for this app instance
    pub fn report_path(&self) -> std::path::PathBuf {
        self.report_dir
            .path()
            .join("data_processing_response/response.json")
    }
}

/// Create a vehicle directly in the store
pub async fn seed_vehicle(
    store: &MemoryStore,
    vehicle_type: VehicleType,
    vehicle_number: &str,
) -> Vehicle {
    store
        .save_vehicle(NewVehicle {
            vehicle_type,
            vehicle_number: vehicle_number.to_string(),
            route_from: "Odesa".to_string(),
            route_to: "Kyiv".to_string(),
        })
        .await
        .expect("Failed to seed vehicle")
}

/// Create a cargo directly in the store
pub async fn seed_cargo(
    store: &MemoryStore,
    vehicle_id: i64,
    description: &str,
    status: DeliveryStatus,
) -> Cargo {
    store
        .save_cargo(NewCargo {
            vehicle_id,
            description: description.to_string(),
            weight: 120.0,
            status,
        })
        .await
        .expect("Failed to seed cargo")
}

/// Send a request and decode the response body as JSON (Null when empty)
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body was not JSON")
    };

    (status, body)
}

/// Helper to send a GET request
pub async fn get_request(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    send(app, request).await
}

/// Helper to send a POST request with a JSON body
pub async fn post_request(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");
    send(app, request).await
}

/// Helper to send a PUT request with a JSON body
pub async fn put_request(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("PUT")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");
    send(app, request).await
}

/// Helper to send a DELETE request
pub async fn delete_request(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("DELETE")
        .body(Body::empty())
        .expect("Failed to build request");
    send(app, request).await
}

/// Helper to send a multipart POST request.
///
/// Each part is `(field_name, file_name, contents)`; the upload endpoint
/// only reads parts whose field name is `file`.
pub async fn upload_request(
    app: &Router,
    uri: &str,
    parts: &[(&str, &str, &str)],
) -> (StatusCode, Value) {
    let mut body = String::new();
    for (field, file_name, contents) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        ));
        body.push_str("Content-Type: application/json\r\n\r\n");
        body.push_str(contents);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("Failed to build request");
    send(app, request).await
}
