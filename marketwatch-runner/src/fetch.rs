//! Fetch stage: download one workbook per calendar day into the stage dir.

use crate::error::StageError;
use marketwatch_core::layout::workbook_path;
use marketwatch_core::{DateRange, EventSink, PipelineEvent, Stage, WorkbookSource};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a completed fetch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub saved: Vec<PathBuf>,
    pub bytes: usize,
}

/// Download every day in `range` from `source` into `stage_dir`.
///
/// The first failure is reported to `sink` and returned; days after it are
/// not attempted. Files already saved are left in place.
pub fn fetch_range(
    source: &dyn WorkbookSource,
    range: &DateRange,
    stage_dir: &Path,
    sink: &dyn EventSink,
) -> Result<FetchSummary, StageError> {
    let result = download_all(source, range, stage_dir, sink);
    if let Err(e) = &result {
        sink.record(&PipelineEvent::StageFailed {
            stage: Stage::Fetcher,
            op: e.op(),
            error: e.to_string(),
        });
    }
    result
}

fn download_all(
    source: &dyn WorkbookSource,
    range: &DateRange,
    stage_dir: &Path,
    sink: &dyn EventSink,
) -> Result<FetchSummary, StageError> {
    fs::create_dir_all(stage_dir).map_err(|e| StageError::CreateDir {
        path: stage_dir.to_path_buf(),
        source: e,
    })?;

    let mut summary = FetchSummary::default();

    for date in range.days() {
        let bytes = source
            .fetch(date)
            .map_err(|e| StageError::Fetch { date, source: e })?;

        let path = workbook_path(stage_dir, date);
        save_workbook(&path, &bytes)?;

        sink.record(&PipelineEvent::WorkbookSaved {
            date,
            path: path.clone(),
            bytes: bytes.len(),
        });
        summary.bytes += bytes.len();
        summary.saved.push(path);
    }

    Ok(summary)
}

/// Write to `{path}.tmp`, then rename into place.
fn save_workbook(path: &Path, bytes: &[u8]) -> Result<(), StageError> {
    let tmp_path = path.with_extension("xlsx.tmp");
    fs::write(&tmp_path, bytes).map_err(|e| StageError::Write {
        path: tmp_path.clone(),
        source: e,
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StageError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })
}
