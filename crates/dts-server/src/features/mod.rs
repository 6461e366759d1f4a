//! Feature modules implementing the delivery tracking API
//!
//! Each feature is organized as a vertical slice with its own commands,
//! queries, and routes.
//!
//! # Features
//!
//! - **cargos**: Cargo CRUD, filtered search, and bulk file import
//! - **vehicles**: Vehicle CRUD with cargo listings
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list, search)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Wire representations shared inside the slice
//!
//! Handlers stay thin: they translate HTTP into a command or query, call
//! its `handle` function against the shared state, and map the outcome
//! back to a response envelope.

pub mod cargos;
pub mod shared;
pub mod vehicles;

use std::sync::Arc;

use axum::Router;

use crate::filter::PredicateRegistry;
use crate::ingest::{IngestionCoordinator, ReportWriter};
use crate::store::Store;

/// Shared state for all feature routes
///
/// The predicate registry is assembled once at startup and never changes
/// afterwards; handlers only read from it.
#[derive(Clone)]
pub struct FeatureState {
    /// Storage backend for cargos and vehicles
    pub store: Arc<dyn Store>,
    /// Worker pool for bulk file ingestion
    pub coordinator: Arc<IngestionCoordinator>,
    /// Writer for the per-batch ingestion report
    pub report: Arc<ReportWriter>,
    /// Registry of known filter fields for cargo search
    pub filters: Arc<PredicateRegistry>,
}

/// Creates the main API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/cargos` - Cargo operations
/// - `/vehicles` - Vehicle operations
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/cargos", cargos::cargos_routes().with_state(state.clone()))
        .nest("/vehicles", vehicles::vehicles_routes().with_state(state))
}
