//! File-backed implementations of the storage collaborators.

pub mod session_file;
pub mod settings;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{AppError, Result};

/// Write `bytes` to `path` through a sibling temp file and an atomic rename.
///
/// Creates the parent directory when missing.
///
/// # Errors
///
/// Returns `AppError::Io` if the directory, temp file or rename fails.
pub async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<()> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|err| AppError::Io(err.error.to_string()))?;
        Ok(())
    })
    .await
    .map_err(|err| AppError::Io(format!("write task panicked: {err}")))?
}

/// Read a file, mapping a missing file to `None`.
///
/// # Errors
///
/// Returns `AppError::Io` for any failure other than not-found.
pub async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(AppError::Io(format!(
            "failed to read {}: {err}",
            path.display()
        ))),
    }
}
