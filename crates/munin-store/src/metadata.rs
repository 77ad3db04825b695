//! Metadata index: a small tabular log of job attributes.
//!
//! One JSON file holds an array of rows keyed by job id. Besides
//! `job_status`, columns are caller-defined key/value pairs. The index
//! exists to short-circuit remote queries: a job recorded as dead is never
//! fetched again.
//!
//! Updates are read-modify-write over the whole file; last write wins per
//! column. No locking — single-process use only, like the job store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;

use munin_job::{JobId, JobStatus};

use crate::error::{StoreError, StoreResult};
use crate::scratch;

/// Column name carrying the last observed job status.
pub const STATUS_COLUMN: &str = "job_status";

/// One row of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRow {
    /// Job the row describes.
    pub job_id: String,
    /// All other columns, caller-defined.
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

impl MetadataRow {
    /// Look up a column value.
    pub fn column(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    /// Parse the recorded `job_status` column, if present and recognized.
    /// Legacy `JobStatus.<NAME>` strings are accepted.
    pub fn job_status(&self) -> Option<JobStatus> {
        self.column(STATUS_COLUMN)
            .and_then(Value::as_str)
            .and_then(JobStatus::parse)
    }
}

/// The on-disk metadata index.
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    path: PathBuf,
}

impl MetadataIndex {
    /// Create an index stored at the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the index at the default `<scratch>/metadata.json` path.
    pub fn default_location() -> StoreResult<Self> {
        Ok(Self::new(scratch::default_metadata_path()?))
    }

    /// File the index persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full table. A missing file is an empty table.
    pub async fn load(&self) -> StoreResult<Vec<MetadataRow>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Get the row for one job id.
    pub async fn get(&self, job_id: &JobId) -> StoreResult<Option<MetadataRow>> {
        let rows = self.load().await?;
        Ok(rows.into_iter().find(|row| row.job_id == job_id.as_str()))
    }

    /// The last recorded status for a job, if any.
    pub async fn status(&self, job_id: &JobId) -> StoreResult<Option<JobStatus>> {
        Ok(self.get(job_id).await?.and_then(|row| row.job_status()))
    }

    /// Merge columns into a job's row, creating the row if absent.
    /// Last write wins per column.
    pub async fn update(&self, job_id: &JobId, columns: Map<String, Value>) -> StoreResult<()> {
        let mut rows = self.load().await?;

        match rows.iter_mut().find(|row| row.job_id == job_id.as_str()) {
            Some(row) => {
                for (key, value) in columns {
                    row.columns.insert(key, value);
                }
            }
            None => rows.push(MetadataRow {
                job_id: job_id.to_string(),
                columns,
            }),
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&rows)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Record a job's status.
    pub async fn record_status(&self, job_id: &JobId, status: JobStatus) -> StoreResult<()> {
        let mut columns = Map::new();
        columns.insert(STATUS_COLUMN.to_string(), Value::String(status.to_string()));
        self.update(job_id, columns).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_index() -> MetadataIndex {
        let path = std::env::temp_dir()
            .join(format!("munin-md-{}", uuid::Uuid::new_v4()))
            .join("metadata.json");
        MetadataIndex::new(path)
    }

    fn columns(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let index = temp_index();
        assert!(index.load().await.unwrap().is_empty());
        assert!(index.get(&JobId::new("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_creates_row_and_merges() {
        let index = temp_index();
        let job_id = JobId::new("job-m");

        index
            .update(&job_id, columns(&[("experiment", json!("rep-d5"))]))
            .await
            .unwrap();
        index
            .update(
                &job_id,
                columns(&[("experiment", json!("rep-d7")), ("rounds", json!(11))]),
            )
            .await
            .unwrap();

        let row = index.get(&job_id).await.unwrap().unwrap();
        // Last write wins per column; untouched columns persist.
        assert_eq!(row.column("experiment"), Some(&json!("rep-d7")));
        assert_eq!(row.column("rounds"), Some(&json!(11)));

        // Only one row for the id.
        assert_eq!(index.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_and_parse_status() {
        let index = temp_index();
        let job_id = JobId::new("job-s");

        index.record_status(&job_id, JobStatus::Error).await.unwrap();
        assert_eq!(
            index.status(&job_id).await.unwrap(),
            Some(JobStatus::Error)
        );
    }

    #[tokio::test]
    async fn test_legacy_status_strings_accepted() {
        let index = temp_index();
        let job_id = JobId::new("job-l");

        index
            .update(
                &job_id,
                columns(&[(STATUS_COLUMN, json!("JobStatus.CANCELLED"))]),
            )
            .await
            .unwrap();
        assert_eq!(
            index.status(&job_id).await.unwrap(),
            Some(JobStatus::Cancelled)
        );
    }

    #[tokio::test]
    async fn test_rows_for_other_jobs_untouched() {
        let index = temp_index();

        index
            .update(&JobId::new("a"), columns(&[("k", json!(1))]))
            .await
            .unwrap();
        index
            .update(&JobId::new("b"), columns(&[("k", json!(2))]))
            .await
            .unwrap();

        let rows = index.load().await.unwrap();
        assert_eq!(rows.len(), 2);
        let a = index.get(&JobId::new("a")).await.unwrap().unwrap();
        assert_eq!(a.column("k"), Some(&json!(1)));
    }
}
