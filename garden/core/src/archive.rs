//! Export and import of the whole garden through a file.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::GardenError;
use crate::messages::TransferOutcome;
use crate::store::EntryStore;

/// Failures while moving the garden in or out of a file
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The export file could not be written
    #[error("could not write {path}: {source}")]
    Write {
        /// Destination file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The import file could not be read
    #[error("could not read {path}: {source}")]
    Read {
        /// Source file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The store rejected the payload or could not persist it
    #[error(transparent)]
    Garden(#[from] GardenError),
}

/// Suggested export file name for `date`
#[must_use]
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("secret-garden-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Write the serialized garden to `path`
///
/// # Errors
///
/// Returns [`ArchiveError::Write`] if the file cannot be written.
pub fn export_to_path(store: &EntryStore, path: &Path) -> Result<(), ArchiveError> {
    let payload = store.serialize_all();
    std::fs::write(path, &payload).map_err(|source| ArchiveError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        entries = store.entries().len(),
        bytes = payload.len(),
        "Exported garden"
    );
    Ok(())
}

/// Replace the garden with the contents of `path`
///
/// # Errors
///
/// Returns [`ArchiveError::Read`] if the file cannot be read, or
/// [`ArchiveError::Garden`] if the payload is malformed or cannot be persisted.
/// The store is unchanged in every error case.
pub fn import_from_path(store: &mut EntryStore, path: &Path) -> Result<(), ArchiveError> {
    let data = std::fs::read(path).map_err(|source| ArchiveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    store.replace_all(&data)?;

    tracing::info!(
        path = %path.display(),
        entries = store.entries().len(),
        flower_count = store.flower_count(),
        "Imported garden"
    );
    Ok(())
}

/// Fold an archive result into the outcome reported to a surface
#[must_use]
pub fn outcome(path: &Path, result: Result<(), ArchiveError>) -> TransferOutcome {
    match result {
        Ok(()) => TransferOutcome::Completed {
            path: path.to_path_buf(),
        },
        Err(e) => TransferOutcome::Failed {
            error: e.to_string(),
        },
    }
}
