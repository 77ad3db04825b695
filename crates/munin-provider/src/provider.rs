//! The saver provider: local-first job retrieval with archival on first
//! successful fetch.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, json};
use tracing::warn;

use munin_job::{JobId, JobStatus, SavedJob};
use munin_store::{JobStore, MetadataIndex, StoreResult};

use crate::backend::RecordingBackend;
use crate::client::{QuantumClient, RemoteBackend};
use crate::error::{ProviderError, ProviderResult};

/// Metadata column recording a completed job's execution timestamp.
pub const EXECUTION_DATE_COLUMN: &str = "execution_date";

/// Options for [`SaverProvider::retrieve_job`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrieveOptions {
    /// Abort without a remote query when the recorded status is still
    /// queued/running.
    pub ignore_running: bool,
    /// Re-fetch and replace an existing local file.
    pub overwrite: bool,
}

impl RetrieveOptions {
    /// Skip jobs whose recorded status is queued or running.
    pub fn ignore_running(mut self) -> Self {
        self.ignore_running = true;
        self
    }

    /// Replace any existing local file with a fresh remote fetch.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

/// Provider that archives remote jobs to local disk and serves them back
/// without re-querying the service.
pub struct SaverProvider {
    store: JobStore,
    index: MetadataIndex,
    client: Arc<dyn QuantumClient>,
}

impl SaverProvider {
    /// Create a provider over the default scratch locations.
    pub fn new(client: Arc<dyn QuantumClient>) -> StoreResult<Self> {
        Ok(Self {
            store: JobStore::default_location()?,
            index: MetadataIndex::default_location()?,
            client,
        })
    }

    /// Create a provider over explicit store and index locations.
    pub fn with_locations(
        client: Arc<dyn QuantumClient>,
        store: JobStore,
        index: MetadataIndex,
    ) -> Self {
        Self {
            store,
            index,
            client,
        }
    }

    /// The underlying job store.
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// The underlying metadata index.
    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    /// Fetch a backend and wrap it so submissions record metadata.
    /// Wrapping is idempotent.
    pub async fn get_backend(&self, name: &str) -> ProviderResult<Box<dyn RemoteBackend>> {
        let backend = self
            .client
            .get_backend(name)
            .await
            .map_err(|e| ProviderError::client(format!("get backend {name}"), e))?;
        Ok(RecordingBackend::wrap(backend, self.index.clone()))
    }

    /// Archive a job to disk. Returns the written path, or `None` when the
    /// job was already saved and `overwrite` is false.
    pub async fn save_job(&self, job: &SavedJob, overwrite: bool) -> ProviderResult<Option<PathBuf>> {
        Ok(self.store.save(job, overwrite).await?)
    }

    /// Retrieve a job, local-first.
    ///
    /// A cached job is served from disk. Otherwise the metadata index is
    /// consulted to skip jobs known to be dead (or, with `ignore_running`,
    /// still pending) before querying the remote service. A live job that
    /// reports `Done` is archived and returned; every other branch returns
    /// `Ok(None)` so the caller can retry later. Only I/O, codec and
    /// client failures are errors.
    pub async fn retrieve_job(
        &self,
        job_id: &JobId,
        options: RetrieveOptions,
    ) -> ProviderResult<Option<SavedJob>> {
        let cached = self.store.find(job_id).await?;

        if cached.is_some() && !options.overwrite {
            return Ok(self.store.load(job_id).await?);
        }

        if let Some(recorded) = self.index.status(job_id).await? {
            if recorded.is_dead() {
                warn!("job {job_id} is recorded as {recorded}; aborting");
                return Ok(None);
            }
            if options.ignore_running && recorded.is_pending() {
                warn!("job {job_id} is recorded as {recorded} and ignore_running is set; aborting");
                return Ok(None);
            }
        }

        if cached.is_none() {
            warn!(
                "job {job_id} not found in {}; retrieving it from the remote service",
                self.store.save_location().display()
            );
        }
        if options.overwrite {
            warn!(
                "overwriting job {job_id} in {}",
                self.store.save_location().display()
            );
        }

        let remote = self
            .client
            .retrieve_job(job_id)
            .await
            .map_err(|e| ProviderError::client(format!("retrieve job {job_id}"), e))?;
        let status = remote
            .status()
            .await
            .map_err(|e| ProviderError::client(format!("status of job {job_id}"), e))?;
        self.index.record_status(job_id, status).await?;

        match status {
            JobStatus::Running | JobStatus::Queued => {
                warn!("job {job_id} is still {status}; aborting");
                Ok(None)
            }
            JobStatus::Done => {
                let mut saved = SavedJob::from_source(&*remote);

                let result = remote
                    .result()
                    .await
                    .map_err(|e| ProviderError::client(format!("result of job {job_id}"), e))?;
                let execution_date = result.as_ref().and_then(|r| r.date);
                match result {
                    Some(result) => saved.attach_result(result)?,
                    None => warn!("job {job_id} is done but reported no result payload"),
                }

                self.store.save(&saved, options.overwrite).await?;

                if let Some(date) = execution_date {
                    let mut columns = Map::new();
                    columns.insert(EXECUTION_DATE_COLUMN.to_string(), json!(date.to_rfc3339()));
                    self.index.update(job_id, columns).await?;
                }

                Ok(Some(saved))
            }
            other => {
                warn!("job {job_id} is in state {other}; metadata updated, aborting");
                Ok(None)
            }
        }
    }
}
