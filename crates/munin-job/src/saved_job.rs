//! Archived job representation.
//!
//! A [`SavedJob`] holds exactly the fields needed to reconstruct a usable
//! job object from disk, with no connection to the remote service. It is
//! built either from a live job handle (via [`JobSource`]) or by decoding
//! a stored document, and is immutable afterwards apart from attaching a
//! result payload once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{JobError, JobResult};
use crate::job::JobId;
use crate::layout::{SerializedLayout, TranspileLayout, encode_layout};
use crate::result::SavedResult;

/// Initial and final layouts of one circuit. Either side may be absent
/// when transpilation assigned no layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitLayouts {
    /// Layout before routing.
    pub initial: Option<TranspileLayout>,
    /// Layout after routing.
    pub final_: Option<TranspileLayout>,
}

/// Read-only view of a live job sufficient to archive it.
///
/// Every accessor except `job_id` is optional with a `None` default:
/// remote job implementations expose different subsets of these fields,
/// and a missing field must never fail the copy.
pub trait JobSource {
    /// The job's unique identifier.
    fn job_id(&self) -> JobId;

    /// Name of the backend the job was submitted to.
    fn backend_name(&self) -> Option<String> {
        None
    }

    /// User-assigned tags.
    fn tags(&self) -> Option<Vec<String>> {
        None
    }

    /// User-assigned display name.
    fn name(&self) -> Option<String> {
        None
    }

    /// Creation timestamp on the remote service.
    fn creation_date(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Options the job was submitted with.
    fn backend_options(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        None
    }

    /// Per-circuit layouts, in submission order.
    fn circuit_layouts(&self) -> Vec<CircuitLayouts> {
        Vec::new()
    }
}

/// A job reconstructed from (or destined for) the local archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    job_id: JobId,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend_options: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_layouts: Option<Vec<Option<SerializedLayout>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_layouts: Option<Vec<Option<SerializedLayout>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<SavedResult>,
}

impl SavedJob {
    /// Create a bare job with only an id and backend name.
    pub fn new(job_id: impl Into<JobId>, backend_name: Option<String>) -> Self {
        Self {
            job_id: job_id.into(),
            backend_name,
            tags: None,
            name: None,
            creation_date: None,
            backend_options: None,
            initial_layouts: None,
            final_layouts: None,
            result: None,
        }
    }

    /// Copy everything archivable out of a live job handle.
    ///
    /// Optional fields the source does not expose stay `None`; the layout
    /// pair of every circuit is serialized in order, with `None` preserved
    /// for circuits that carry no layout. The result payload is attached
    /// separately via [`SavedJob::attach_result`].
    pub fn from_source<S: JobSource + ?Sized>(source: &S) -> Self {
        let layouts = source.circuit_layouts();
        let (initial_layouts, final_layouts) = if layouts.is_empty() {
            (None, None)
        } else {
            (
                Some(
                    layouts
                        .iter()
                        .map(|l| encode_layout(l.initial.as_ref()))
                        .collect(),
                ),
                Some(
                    layouts
                        .iter()
                        .map(|l| encode_layout(l.final_.as_ref()))
                        .collect(),
                ),
            )
        };

        let job_id = source.job_id();
        if source.backend_name().is_none() {
            debug!("job {job_id} source exposes no backend name");
        }

        Self {
            job_id,
            backend_name: source.backend_name(),
            tags: source.tags(),
            name: source.name(),
            creation_date: source.creation_date(),
            backend_options: source.backend_options(),
            initial_layouts,
            final_layouts,
            result: None,
        }
    }

    /// Attach the result payload. Valid exactly once.
    pub fn attach_result(&mut self, result: SavedResult) -> JobResult<()> {
        if self.result.is_some() {
            return Err(JobError::ResultAlreadyAttached(self.job_id.clone()));
        }
        self.result = Some(result);
        Ok(())
    }

    /// The job identifier.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// The backend the job was submitted to, when known.
    pub fn backend_name(&self) -> Option<&str> {
        self.backend_name.as_deref()
    }

    /// User-assigned tags.
    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    /// User-assigned display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Creation timestamp on the remote service.
    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.creation_date
    }

    /// Options the job was submitted with.
    pub fn backend_options(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.backend_options.as_ref()
    }

    /// Serialized initial layouts, one entry per circuit.
    pub fn initial_layouts(&self) -> Option<&[Option<SerializedLayout>]> {
        self.initial_layouts.as_deref()
    }

    /// Serialized final layouts, one entry per circuit.
    pub fn final_layouts(&self) -> Option<&[Option<SerializedLayout>]> {
        self.final_layouts.as_deref()
    }

    /// The result payload, when one was attached.
    pub fn result(&self) -> Option<&SavedResult> {
        self.result.as_ref()
    }

    /// Submitting an archived job is impossible: it carries no connection
    /// to the remote service.
    pub fn submit(&self) -> JobResult<()> {
        Err(JobError::Unsupported("submit".into()))
    }

    /// Status polling is impossible on an archived job.
    pub fn status(&self) -> JobResult<crate::job::JobStatus> {
        Err(JobError::Unsupported("status".into()))
    }
}
