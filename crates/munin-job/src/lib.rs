//! Munin archived-job model and codecs.
//!
//! This crate defines the persisted representation of a quantum job and
//! the codecs that move it to and from JSON:
//!
//! - [`SavedJob`] — the archived job: id, backend, tags, options, layouts
//!   and an optional result payload, with the same accessor surface as a
//!   live handle minus the network operations.
//! - [`JobSource`] — the narrow read-only interface a live job handle
//!   implements so it can be archived; every optional field defaults to
//!   absent.
//! - [`layout`] — the qubit-layout string codec
//!   (`QuantumRegister(2, 'code'), 1` ↔ `{register: {qubit: physical}}`).
//! - [`tagged`] — tagged-value JSON encoding for complex scalars, numeric
//!   arrays and byte buffers inside result payloads.
//! - [`codec`] — the versioned one-job-per-document JSON codec.
//!
//! # Example
//!
//! ```ignore
//! use munin_job::{SavedJob, codec};
//!
//! let job = SavedJob::from_source(&live_handle);
//! let document = codec::encode_job(&job)?;
//! let restored = codec::decode_job(&document)?;
//! assert_eq!(restored.job_id(), job.job_id());
//! // No network on an archived job:
//! assert!(restored.submit().is_err());
//! ```

pub mod codec;
pub mod error;
pub mod job;
pub mod layout;
pub mod result;
pub mod saved_job;
pub mod tagged;

pub use codec::{DOCUMENT_VERSION, decode_job, encode_job};
pub use error::{JobError, JobResult};
pub use job::{JobId, JobStatus};
pub use layout::{
    QubitRef, RegisterLayouts, SerializedLayout, TranspileLayout, decode_layout, encode_layout,
};
pub use result::{ExperimentData, ExperimentResult, SavedResult};
pub use saved_job::{CircuitLayouts, JobSource, SavedJob};
pub use tagged::{TAG_FORMAT_VERSION, TypedValue};
