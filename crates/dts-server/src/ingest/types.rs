//! Data carried through the ingestion pipeline

use serde::{Deserialize, Serialize};

use crate::domain::DeliveryStatus;
use crate::features::shared::validation::{
    validate_description, validate_vehicle_number, validate_weight,
};

/// One uploaded file, held in memory for the duration of the batch
#[derive(Debug, Clone)]
pub struct IngestFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl IngestFile {
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }
}

/// A cargo record as it appears in uploaded files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRecord {
    pub description: String,
    pub weight: f64,
    pub status: DeliveryStatus,
    pub vehicle_number: String,
}

impl IngestRecord {
    /// Business-rule check applied after decode. A violation makes the
    /// record a counted failure, like an unresolved vehicle reference; it
    /// does not abort the file.
    pub fn validate(&self) -> Result<(), String> {
        validate_vehicle_number(&self.vehicle_number).map_err(|e| e.to_string())?;
        validate_description(&self.description).map_err(|e| e.to_string())?;
        validate_weight(self.weight).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Per-file import counts.
///
/// Outcomes are immutable once a file task completes and combine
/// associatively, so batch totals do not depend on completion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOutcome {
    pub succeeded: u64,
    pub failed: u64,
}

impl FileOutcome {
    pub fn new(succeeded: u64, failed: u64) -> Self {
        Self { succeeded, failed }
    }

    pub fn combine(self, other: FileOutcome) -> FileOutcome {
        FileOutcome {
            succeeded: self.succeeded + other.succeeded,
            failed: self.failed + other.failed,
        }
    }
}

impl std::iter::Sum for FileOutcome {
    fn sum<I: Iterator<Item = FileOutcome>>(iter: I) -> Self {
        iter.fold(FileOutcome::default(), FileOutcome::combine)
    }
}

/// Totals for one ingestion batch, as reported to clients and written to
/// the report artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub successful_imports: u64,
    pub failed_imports: u64,
}

impl BatchSummary {
    /// A batch is accepted when it imported at least one record.
    pub fn accepted(&self) -> bool {
        self.successful_imports > 0
    }
}

impl From<FileOutcome> for BatchSummary {
    fn from(outcome: FileOutcome) -> Self {
        Self {
            successful_imports: outcome.succeeded,
            failed_imports: outcome.failed,
        }
    }
}
