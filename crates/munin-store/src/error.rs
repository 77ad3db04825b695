//! Error handling for the on-disk archive.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the job store and metadata index.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Saving a job failed; carries the job id and the underlying cause.
    #[error("Failed to save job {job_id}: {message}")]
    SaveFailed {
        /// Job the save was for.
        job_id: String,
        /// Underlying cause.
        message: String,
    },

    /// Loading a cached job failed; carries the job id and the cause.
    #[error("Failed to load job {job_id}: {message}")]
    LoadFailed {
        /// Job the load was for.
        job_id: String,
        /// Underlying cause.
        message: String,
    },

    /// The scratch root could not be resolved or created.
    #[error("Scratch directory unavailable: {0}")]
    ScratchUnavailable(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Job codec error.
    #[error("Codec error: {0}")]
    Codec(#[from] munin_job::JobError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_failed_names_job() {
        let err = StoreError::SaveFailed {
            job_id: "job-9".into(),
            message: "disk full".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("job-9"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
