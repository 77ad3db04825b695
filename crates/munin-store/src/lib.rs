//! Munin on-disk storage: the gzip job archive and the metadata index.
//!
//! - [`JobStore`] — one gzip-compressed JSON document per job under a save
//!   directory, named `{timestamp}-{job_id}.json.gz`.
//! - [`MetadataIndex`] — a flat JSON table of job attributes used to skip
//!   redundant remote queries.
//! - [`scratch`] — resolution of the process-wide scratch root that both
//!   default locations hang off.
//!
//! Everything here is single-process: writes are not atomic and nothing
//! locks the directory or the index file.

pub mod error;
pub mod metadata;
pub mod scratch;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use metadata::{MetadataIndex, MetadataRow, STATUS_COLUMN};
pub use scratch::{SCRATCH_ENV, find_and_create_scratch};
pub use store::JobStore;
