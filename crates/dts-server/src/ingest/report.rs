//! Batch report artifact
//!
//! After every upload batch the summary is written to a well-known path so
//! operators can inspect the result of the last run without trawling logs.
//! The file is replaced on each batch.

use std::path::PathBuf;

use super::types::BatchSummary;

/// Report location relative to the configured base directory.
pub const REPORT_RELATIVE_PATH: &str = "data_processing_response/response.json";

/// Writes batch summaries to disk as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    base_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Full path of the report file.
    pub fn path(&self) -> PathBuf {
        self.base_dir.join(REPORT_RELATIVE_PATH)
    }

    /// Write `summary` to the report path, creating parent directories as
    /// needed. Any previous report is overwritten.
    #[tracing::instrument(skip(self, summary), fields(path = %self.path().display()))]
    pub async fn write(&self, summary: &BatchSummary) -> dts_common::Result<PathBuf> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(summary)?;
        tokio::fs::write(&path, body).await?;

        Ok(path)
    }
}
