//! Bulk upload command
//!
//! Hands a batch of uploaded JSON files to the ingestion pipeline and
//! records the combined summary in the report artifact. The batch itself
//! cannot fail; only an empty upload or an unwritable report is an error.

use dts_common::DtsError;

use crate::ingest::{BatchSummary, IngestFile, IngestionCoordinator, ReportWriter};

/// Command carrying the uploaded file parts
#[derive(Debug, Clone)]
pub struct UploadCargoFilesCommand {
    pub files: Vec<IngestFile>,
}

/// Errors that can occur when running an upload batch
#[derive(Debug, thiserror::Error)]
pub enum UploadCargoFilesError {
    #[error("At least one file part named 'file' is required")]
    NoFiles,

    #[error("Failed to write ingestion report: {0}")]
    Report(#[from] DtsError),
}

/// Handles the upload command
///
/// # Errors
///
/// - `NoFiles` - The request carried no file parts
/// - `Report` - The summary could not be written to disk
#[tracing::instrument(skip(coordinator, report, command), fields(files = command.files.len()))]
pub async fn handle(
    coordinator: &IngestionCoordinator,
    report: &ReportWriter,
    command: UploadCargoFilesCommand,
) -> Result<BatchSummary, UploadCargoFilesError> {
    if command.files.is_empty() {
        return Err(UploadCargoFilesError::NoFiles);
    }

    let summary = coordinator.ingest(command.files).await;
    tracing::info!(
        successful = summary.successful_imports,
        failed = summary.failed_imports,
        "Upload batch processed"
    );

    let path = report.write(&summary).await?;
    tracing::info!(report = %path.display(), "Ingestion report written");

    Ok(summary)
}
