//! Scratch-root resolution.
//!
//! All default storage lives under one process-wide scratch root:
//! `$MUNIN_SCRATCH` when set, else the platform data directory
//! (`~/.local/share/munin` on Linux), else the current directory.

use std::path::PathBuf;

use crate::error::{StoreError, StoreResult};

/// Environment variable overriding the scratch root.
pub const SCRATCH_ENV: &str = "MUNIN_SCRATCH";

/// Resolve the scratch root, creating it if absent.
pub fn find_and_create_scratch() -> StoreResult<PathBuf> {
    let root = match std::env::var_os(SCRATCH_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("munin"),
    };

    std::fs::create_dir_all(&root)
        .map_err(|e| StoreError::ScratchUnavailable(format!("{}: {e}", root.display())))?;
    Ok(root)
}

/// Default directory for archived jobs: `<scratch>/jobs`.
pub fn default_jobs_dir() -> StoreResult<PathBuf> {
    Ok(find_and_create_scratch()?.join("jobs"))
}

/// Default path of the metadata index: `<scratch>/metadata.json`.
pub fn default_metadata_path() -> StoreResult<PathBuf> {
    Ok(find_and_create_scratch()?.join("metadata.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var manipulation is process-global; keep it in one test.
    #[test]
    fn test_scratch_env_override_and_defaults() {
        let dir = std::env::temp_dir().join(format!("munin-scratch-{}", std::process::id()));
        // SAFETY: tests in this module run single-threaded over this var.
        unsafe { std::env::set_var(SCRATCH_ENV, &dir) };

        let root = find_and_create_scratch().unwrap();
        assert_eq!(root, dir);
        assert!(root.is_dir());

        assert_eq!(default_jobs_dir().unwrap(), dir.join("jobs"));
        assert_eq!(default_metadata_path().unwrap(), dir.join("metadata.json"));

        unsafe { std::env::remove_var(SCRATCH_ENV) };
        std::fs::remove_dir_all(&dir).ok();
    }
}
