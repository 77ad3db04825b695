//! Error types for the provider.

use thiserror::Error;

use crate::client::ClientError;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while saving or retrieving jobs.
///
/// Status-related conditions (job dead, still running, nothing cached) are
/// not errors — they surface as `Ok(None)` from the provider. Only I/O,
/// codec and remote-client failures reach this type.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The remote service client failed.
    #[error("Remote service error ({context}): {message}")]
    Client {
        /// What the client was doing, usually naming the job id.
        context: String,
        /// Underlying client message.
        message: String,
    },

    /// Store or metadata-index failure.
    #[error("Store error: {0}")]
    Store(#[from] munin_store::StoreError),

    /// Job codec failure.
    #[error("Job error: {0}")]
    Job(#[from] munin_job::JobError),
}

impl ProviderError {
    /// Wrap a client error with context (typically the job id).
    pub fn client(context: impl Into<String>, error: ClientError) -> Self {
        ProviderError::Client {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_carries_context() {
        let err = ProviderError::client("retrieve job job-3", ClientError::new("timeout"));
        let msg = err.to_string();
        assert!(msg.contains("job-3"));
        assert!(msg.contains("timeout"));
    }
}
