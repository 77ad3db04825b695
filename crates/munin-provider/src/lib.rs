//! Munin provider: local-first access to quantum jobs.
//!
//! Wraps an opaque remote-service client ([`QuantumClient`]) with an
//! on-disk archive so completed jobs are fetched once and served from
//! local gzip files afterwards.
//!
//! - [`SaverProvider`] — save/retrieve orchestration over the store, the
//!   metadata index and the remote client.
//! - [`RecordingBackend`] — decorator recording submission metadata,
//!   applied idempotently at backend-acquisition time.
//! - [`client`] — the object-safe traits a concrete SDK binding
//!   implements.
//!
//! # Example
//!
//! ```ignore
//! use munin_provider::{SaverProvider, RetrieveOptions};
//!
//! let provider = SaverProvider::new(client)?;
//! // Cached? served from disk. Done remotely? archived, then returned.
//! // Dead or still running? Ok(None) — retry later.
//! let job = provider
//!     .retrieve_job(&"crk5q2b4".into(), RetrieveOptions::default())
//!     .await?;
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod provider;

pub use backend::{BACKEND_COLUMN, RecordingBackend, SUBMITTED_COLUMN};
pub use client::{ClientError, ClientResult, QuantumClient, RemoteBackend, RemoteJob, RunRequest};
pub use error::{ProviderError, ProviderResult};
pub use provider::{EXECUTION_DATE_COLUMN, RetrieveOptions, SaverProvider};
