//! Error types for archived jobs and their codecs.

use thiserror::Error;

use crate::job::JobId;

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;

/// Errors that can occur on archived jobs and during (de)serialization.
#[derive(Debug, Error)]
pub enum JobError {
    /// Operation requires a live connection to the remote service.
    #[error("Operation '{0}' is not supported on an archived job")]
    Unsupported(String),

    /// A result payload was already attached to the job.
    #[error("Job {0} already has a result attached")]
    ResultAlreadyAttached(JobId),

    /// Tagged value carries a tag outside the known vocabulary.
    #[error("Unknown value tag: {0}")]
    UnknownTag(String),

    /// Document format version is not supported by this build.
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(u32),

    /// Array payload shape does not match its data length.
    #[error("Array shape mismatch: shape implies {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Element count implied by the shape.
        expected: usize,
        /// Element count actually present.
        actual: usize,
    },

    /// Tagged value payload has the wrong JSON structure.
    #[error("Malformed tagged value: {0}")]
    MalformedValue(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error in a byte payload.
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_operation() {
        let err = JobError::Unsupported("submit".into());
        assert!(err.to_string().contains("submit"));
        assert!(err.to_string().contains("archived"));
    }

    #[test]
    fn test_result_already_attached_names_job() {
        let err = JobError::ResultAlreadyAttached(JobId::new("job-7"));
        assert!(err.to_string().contains("job-7"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = JobError::ShapeMismatch {
            expected: 6,
            actual: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('6'));
        assert!(msg.contains('4'));
    }
}
