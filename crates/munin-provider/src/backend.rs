//! Metadata-recording backend wrapper.
//!
//! The original service hands out plain backend handles; this wrapper
//! records a metadata row for every submitted job. It replaces runtime
//! method patching with an explicit decorator applied once at
//! backend-acquisition time, guarded by the `records_metadata` marker.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::warn;

use munin_job::JobId;
use munin_store::MetadataIndex;

use crate::client::{ClientResult, RemoteBackend, RemoteJob, RunRequest};

/// Column recording which backend a job was submitted to.
pub const BACKEND_COLUMN: &str = "backend";

/// Column recording the submission timestamp.
pub const SUBMITTED_COLUMN: &str = "submitted";

/// A backend handle that records submission metadata into the index.
#[derive(Debug)]
pub struct RecordingBackend {
    inner: Box<dyn RemoteBackend>,
    index: MetadataIndex,
}

impl RecordingBackend {
    /// Wrap a backend handle, idempotently.
    ///
    /// A handle that already records metadata is returned unchanged —
    /// wrapping twice must not produce double rows.
    pub fn wrap(inner: Box<dyn RemoteBackend>, index: MetadataIndex) -> Box<dyn RemoteBackend> {
        if inner.records_metadata() {
            return inner;
        }
        Box::new(Self { inner, index })
    }

    /// Merge columns into the job's metadata row.
    ///
    /// Recording is best-effort: the job was already submitted, so a
    /// metadata failure is a warning, never a submission failure.
    async fn record(&self, job_id: &JobId, mut columns: Map<String, Value>) {
        columns.insert(BACKEND_COLUMN.to_string(), json!(self.inner.name()));
        if let Err(e) = self.index.update(job_id, columns).await {
            warn!("failed to record metadata for job {job_id}: {e}");
        }
    }
}

#[async_trait]
impl RemoteBackend for RecordingBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn records_metadata(&self) -> bool {
        true
    }

    async fn run(&self, request: RunRequest) -> ClientResult<Box<dyn RemoteJob>> {
        let job = self.inner.run(request).await?;

        let mut columns = Map::new();
        columns.insert(SUBMITTED_COLUMN.to_string(), json!(Utc::now().to_rfc3339()));
        self.record(&job.job_id(), columns).await;

        Ok(job)
    }

    async fn run_with_metadata(
        &self,
        request: RunRequest,
        columns: Map<String, Value>,
    ) -> ClientResult<Box<dyn RemoteJob>> {
        let job = self.inner.run(request).await?;

        let mut columns = columns;
        columns.insert(SUBMITTED_COLUMN.to_string(), json!(Utc::now().to_rfc3339()));
        self.record(&job.job_id(), columns).await;

        Ok(job)
    }
}
