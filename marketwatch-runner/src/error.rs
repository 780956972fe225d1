//! Stage-aborting errors.

use chrono::NaiveDate;
use marketwatch_core::{FetchError, TableError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a stage run. Skippable conditions (missing workbook,
/// weekend, missing column) never show up here.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("download for {date} failed: {source}")]
    Fetch { date: NaiveDate, source: FetchError },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to delete {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to convert {path}: {source}")]
    Convert { path: PathBuf, source: TableError },
}

impl StageError {
    /// The operation that failed, for the `(stage, op, message)` log triple.
    pub fn op(&self) -> &'static str {
        match self {
            StageError::CreateDir { .. } => "prepare_dir",
            StageError::ListDir { .. } => "process_files",
            StageError::Fetch { .. } => "download_workbook",
            StageError::Write { .. } => "save_workbook",
            StageError::Remove { .. } => "remove_workbook",
            StageError::Convert { .. } => "save_csv",
        }
    }
}
