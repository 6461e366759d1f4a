//! Delivery tracking server
//!
//! HTTP server for tracking cargo deliveries across a vehicle fleet.
//!
//! Write operations (create, update, delete, bulk upload) live under
//! `features/*/commands` and read operations (get, list, search) under
//! `features/*/queries`; each handler owns its request type, its validation,
//! and its error mapping. Routes are assembled per feature and nested under
//! `/api/v1`. Storage sits behind the [`Store`] trait, with a postgres
//! implementation on `sqlx` and an in-memory one for local runs and tests.
//!
//! ## Bulk ingestion
//!
//! `POST /api/v1/cargos/file/upload` accepts multipart JSON files and fans
//! them out across a bounded worker pool. Each record is validated and
//! resolved to a vehicle independently, so one bad record (or one malformed
//! file) never sinks the rest of the batch. The outcome is a single
//! imported/failed tally, which is also written to disk as a report
//! artifact.
//!
//! ## Search
//!
//! `GET /api/v1/cargos/_list` turns field-keyed query parameters (delivery
//! status, vehicle type) into one conjunctive predicate. Unknown fields are
//! rejected; values within a field are OR-ed.
//!
//! # Example
//!
//! ```no_run
//! use dts_server::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     println!("would bind {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod domain;
pub mod features;
pub mod filter;
pub mod ingest;
pub mod middleware;
pub mod store;

pub use features::FeatureState;
pub use store::{Store, StoreError};
