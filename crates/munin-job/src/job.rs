//! Job identifiers and status.
//!
//! Status values mirror the remote service's job lifecycle:
//!
//! ```text
//!   run() ──→ Queued ──→ Running ──→ Done
//!               │           │
//!               │           ├──→ Error
//!               │           │
//!               └───────────┴──→ Cancelled
//! ```
//!
//! Terminal states (`Done`, `Error`, `Cancelled`) are permanent; only a
//! `Done` job has a retrievable result.

use serde::{Deserialize, Serialize};

/// Unique identifier for a job, assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job is waiting in queue.
    Queued,
    /// Job is currently running.
    Running,
    /// Job completed successfully; a result is available.
    Done,
    /// Job failed on the remote service.
    Error,
    /// Job was cancelled.
    Cancelled,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error | JobStatus::Cancelled)
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    /// Check if the job completed successfully.
    pub fn is_done(&self) -> bool {
        matches!(self, JobStatus::Done)
    }

    /// Check if the job is dead (failed or cancelled) and will never
    /// produce a result.
    pub fn is_dead(&self) -> bool {
        matches!(self, JobStatus::Error | JobStatus::Cancelled)
    }

    /// Parse a status string as recorded in the metadata index.
    ///
    /// Case-insensitive. Accepts the legacy `JobStatus.<NAME>` form that
    /// older metadata tables contain alongside the plain uppercase form.
    /// Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix("JobStatus.").unwrap_or(s);
        match s.to_ascii_uppercase().as_str() {
            "QUEUED" => Some(JobStatus::Queued),
            "RUNNING" => Some(JobStatus::Running),
            "DONE" => Some(JobStatus::Done),
            "ERROR" => Some(JobStatus::Error),
            "CANCELLED" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "QUEUED"),
            JobStatus::Running => write!(f, "RUNNING"),
            JobStatus::Done => write!(f, "DONE"),
            JobStatus::Error => write!(f, "ERROR"),
            JobStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
