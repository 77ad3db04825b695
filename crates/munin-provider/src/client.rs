//! Black-box view of the remote quantum service.
//!
//! The provider consumes three opaque operations: fetch a backend by name,
//! retrieve a job by id, and run circuits on a backend. Concrete SDK
//! bindings implement these traits; the provider never sees past them.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use munin_job::{JobId, JobSource, JobStatus, SavedResult};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Opaque failure from the remote service client.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ClientError(String);

impl ClientError {
    /// Create a client error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A run submission: circuits plus execution options.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Circuit programs, serialized in whatever form the service accepts.
    pub circuits: Vec<String>,
    /// Number of shots per circuit.
    pub shots: u32,
    /// Further backend options, passed through opaquely.
    pub options: Map<String, Value>,
}

impl RunRequest {
    /// Create a request with no extra options.
    pub fn new(circuits: Vec<String>, shots: u32) -> Self {
        Self {
            circuits,
            shots,
            options: Map::new(),
        }
    }

    /// Add a backend option.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// A live job handle on the remote service.
///
/// The [`JobSource`] supertrait exposes the archivable snapshot (id, tags,
/// layouts, ...); the async methods here are the network-dependent part.
#[async_trait]
pub trait RemoteJob: JobSource + Send + Sync {
    /// Query the job's current status.
    async fn status(&self) -> ClientResult<JobStatus>;

    /// Fetch the result payload. `None` while no result exists.
    async fn result(&self) -> ClientResult<Option<SavedResult>>;
}

/// A named execution target on the remote service.
#[async_trait]
pub trait RemoteBackend: std::fmt::Debug + Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Whether this handle already records submission metadata.
    ///
    /// The wrapper-presence marker: [`RecordingBackend::wrap`] consults it
    /// so an already-wrapped handle is never wrapped twice.
    ///
    /// [`RecordingBackend::wrap`]: crate::backend::RecordingBackend::wrap
    fn records_metadata(&self) -> bool {
        false
    }

    /// Submit circuits for execution.
    async fn run(&self, request: RunRequest) -> ClientResult<Box<dyn RemoteJob>>;

    /// Submit circuits and record caller-supplied metadata columns for the
    /// new job. Backends without a metadata index ignore the columns.
    async fn run_with_metadata(
        &self,
        request: RunRequest,
        columns: Map<String, Value>,
    ) -> ClientResult<Box<dyn RemoteJob>> {
        let _ = columns;
        self.run(request).await
    }
}

/// The remote service itself.
#[async_trait]
pub trait QuantumClient: Send + Sync {
    /// Fetch a backend by name.
    async fn get_backend(&self, name: &str) -> ClientResult<Box<dyn RemoteBackend>>;

    /// Retrieve a job by id.
    async fn retrieve_job(&self, job_id: &JobId) -> ClientResult<Box<dyn RemoteJob>>;
}
