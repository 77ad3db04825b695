//! Gzip-compressed one-file-per-job archive.
//!
//! Each job is stored as `{%Y.%m.%d-%Hh%M}-{job_id}.json.gz` under the
//! configured save directory. Lookup scans the directory and matches the
//! trailing id segment of each well-formed filename exactly — a linear
//! scan, which is fine at the expected scale (a handful of locally cached
//! jobs).
//!
//! Writes are not atomic and nothing locks the directory; concurrent
//! processes are unsupported.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tokio::fs;
use tracing::{debug, warn};

use munin_job::{JobId, SavedJob, decode_job, encode_job};

use crate::error::{StoreError, StoreResult};
use crate::scratch;

/// On-disk job archive rooted at one directory.
#[derive(Debug, Clone)]
pub struct JobStore {
    save_location: PathBuf,
}

impl JobStore {
    /// Create a store over the given directory. The directory is created
    /// lazily on first save.
    pub fn new(save_location: impl Into<PathBuf>) -> Self {
        Self {
            save_location: save_location.into(),
        }
    }

    /// Create a store over the default `<scratch>/jobs` directory.
    pub fn default_location() -> StoreResult<Self> {
        Ok(Self::new(scratch::default_jobs_dir()?))
    }

    /// The directory this store saves into.
    pub fn save_location(&self) -> &Path {
        &self.save_location
    }

    /// Find the cached file for a job id, if one exists.
    ///
    /// Matches the id segment exactly; a job id that is a substring of
    /// another job's id never matches the wrong file. A missing save
    /// directory simply means nothing is cached yet.
    pub async fn find(&self, job_id: &JobId) -> StoreResult<Option<PathBuf>> {
        let mut entries = match fs::read_dir(&self.save_location).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match file_job_id(name) {
                Some(id) if id == job_id.as_str() => return Ok(Some(entry.path())),
                Some(_) => {}
                None => debug!("ignoring file with unrecognized name: {name}"),
            }
        }

        Ok(None)
    }

    /// Save a job, returning the path written.
    ///
    /// If the job is already cached and `overwrite` is false this is a
    /// no-op: a warning is emitted and no path is returned, leaving the
    /// existing file byte-identical. With `overwrite` the existing path is
    /// reused so a job id never accumulates duplicate files.
    pub async fn save(&self, job: &SavedJob, overwrite: bool) -> StoreResult<Option<PathBuf>> {
        let job_id = job.job_id().clone();
        let existing = self.find(&job_id).await?;

        if let Some(path) = &existing {
            if !overwrite {
                warn!("job {job_id} already saved at {}; skipping", path.display());
                return Ok(None);
            }
            warn!("overwriting job {job_id} at {}", path.display());
        }

        let path = existing.unwrap_or_else(|| self.save_location.join(saved_name(&job_id)));

        self.write_job(job, &path)
            .await
            .map_err(|e| StoreError::SaveFailed {
                job_id: job_id.to_string(),
                message: e.to_string(),
            })?;

        Ok(Some(path))
    }

    /// Load a cached job. `Ok(None)` when nothing is cached for this id.
    pub async fn load(&self, job_id: &JobId) -> StoreResult<Option<SavedJob>> {
        let Some(path) = self.find(job_id).await? else {
            return Ok(None);
        };

        let job = self
            .read_job(&path)
            .await
            .map_err(|e| StoreError::LoadFailed {
                job_id: job_id.to_string(),
                message: e.to_string(),
            })?;
        Ok(Some(job))
    }

    async fn write_job(&self, job: &SavedJob, path: &Path) -> StoreResult<()> {
        fs::create_dir_all(&self.save_location).await?;

        let document = encode_job(job)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(document.as_bytes())?;
        let compressed = encoder.finish()?;

        fs::write(path, compressed).await?;
        Ok(())
    }

    async fn read_job(&self, path: &Path) -> StoreResult<SavedJob> {
        let compressed = fs::read(path).await?;
        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut document = String::new();
        decoder.read_to_string(&mut document)?;
        Ok(decode_job(&document)?)
    }
}

/// Filename for a newly saved job: save timestamp plus the job id.
fn saved_name(job_id: &JobId) -> String {
    let date_str = Utc::now().format("%Y.%m.%d-%Hh%M");
    format!("{date_str}-{job_id}.json.gz")
}

/// Extract the job id segment from an archive filename.
///
/// `2025.03.14-09h26-<job_id>.json.gz` → `<job_id>`. The id itself may
/// contain dashes; only the two leading timestamp segments are stripped.
fn file_job_id(name: &str) -> Option<&str> {
    let stem = name.strip_suffix(".json.gz")?;
    let mut parts = stem.splitn(3, '-');
    let _date = parts.next()?;
    let _time = parts.next()?;
    parts.next().filter(|id| !id.is_empty())
}
