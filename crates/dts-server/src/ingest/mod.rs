//! Concurrent bulk ingestion of cargo record files
//!
//! An uploaded batch is a finite set of JSON files, each holding an array
//! of cargo records. The [`IngestionCoordinator`] runs one task per file on
//! a bounded worker pool, each task parses and persists its file's records,
//! and the per-file [`FileOutcome`]s combine into one [`BatchSummary`]
//! independent of completion order. The summary is also written to disk by
//! the [`ReportWriter`].

pub mod coordinator;
pub mod parser;
pub mod report;
pub mod types;

pub use coordinator::{default_workers, IngestError, IngestionCoordinator, DEFAULT_SHUTDOWN_GRACE};
pub use parser::{parse_records, MalformedInput};
pub use report::{ReportWriter, REPORT_RELATIVE_PATH};
pub use types::{BatchSummary, FileOutcome, IngestFile, IngestRecord};
