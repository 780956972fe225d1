//! Analyze stage: rank every converted CSV by each criterion.
//!
//! Each (file, criterion) pair is independent. A missing column is an
//! expected skip; any other failure is counted and the run moves on.

use crate::error::StageError;
use marketwatch_core::layout::{is_csv_name, DEFAULT_DATA_DIR, DEFAULT_STAGE_DIR};
use marketwatch_core::ranking::HEADER_SKIP_ROWS;
use marketwatch_core::{
    rank_table, Criterion, EventSink, PipelineEvent, RankError, Stage, StageTable, TiePolicy,
};

/// Data rows included in the per-file preview event.
const PREVIEW_ROWS: usize = 5;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for an analyze run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub stage_dir: PathBuf,
    pub data_dir: PathBuf,
    pub ties: TiePolicy,
}

impl Default for AnalyzeOptions {
    /// `stage` in, `data` out, ties included.
    fn default() -> Self {
        Self {
            stage_dir: PathBuf::from(DEFAULT_STAGE_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            ties: TiePolicy::default(),
        }
    }
}

/// Outcome of a completed analyze run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnalyzeSummary {
    /// CSV files found in the stage directory.
    pub files: usize,
    /// Ranking files written to the data directory.
    pub written: Vec<PathBuf>,
    pub missing_columns: usize,
    pub failures: Vec<(PathBuf, Criterion, String)>,
}

impl AnalyzeSummary {
    /// No ranking failed for a reason other than a missing column.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rank every `.csv` file in the stage directory, in file-name order.
///
/// Only directory-level failures abort the run.
pub fn analyze_stage(opts: &AnalyzeOptions, sink: &dyn EventSink) -> Result<AnalyzeSummary, StageError> {
    let result = analyze_all(opts, sink);
    if let Err(e) = &result {
        sink.record(&PipelineEvent::StageFailed {
            stage: Stage::Analyzer,
            op: e.op(),
            error: e.to_string(),
        });
    }
    result
}

fn analyze_all(opts: &AnalyzeOptions, sink: &dyn EventSink) -> Result<AnalyzeSummary, StageError> {
    let files = list_csv_files(&opts.stage_dir)?;

    fs::create_dir_all(&opts.data_dir).map_err(|e| StageError::CreateDir {
        path: opts.data_dir.clone(),
        source: e,
    })?;

    let mut summary = AnalyzeSummary {
        files: files.len(),
        ..AnalyzeSummary::default()
    };

    for file in &files {
        analyze_file(file, opts, sink, &mut summary);
    }

    Ok(summary)
}

/// Read one converted table and rank it by every criterion. A table that
/// cannot be read fails all of its rankings.
pub fn analyze_file(
    source: &Path,
    opts: &AnalyzeOptions,
    sink: &dyn EventSink,
    summary: &mut AnalyzeSummary,
) {
    let table = match StageTable::read(source, HEADER_SKIP_ROWS) {
        Ok(table) => table,
        Err(e) => {
            for criterion in Criterion::ALL {
                record_failure(source, criterion, &e, sink, summary);
            }
            return;
        }
    };

    sink.record(&PipelineEvent::TableLoaded {
        source: source.to_path_buf(),
        columns: table.columns.clone(),
        preview: table.preview(PREVIEW_ROWS).to_vec(),
        rows: table.rows.len(),
    });

    for criterion in Criterion::ALL {
        analyze_csv(&table, source, criterion, opts, sink, summary);
    }
}

/// Run one ranking and fold its result into `summary`.
pub fn analyze_csv(
    table: &StageTable,
    source: &Path,
    criterion: Criterion,
    opts: &AnalyzeOptions,
    sink: &dyn EventSink,
    summary: &mut AnalyzeSummary,
) {
    match rank_table(table, source, criterion, &opts.data_dir, opts.ties) {
        Ok((path, rows)) => {
            sink.record(&PipelineEvent::RankingWritten {
                source: source.to_path_buf(),
                criterion,
                path: path.clone(),
                rows,
            });
            summary.written.push(path);
        }
        Err(RankError::MissingColumn { column }) => {
            sink.record(&PipelineEvent::ColumnMissing {
                source: source.to_path_buf(),
                criterion,
                column,
            });
            summary.missing_columns += 1;
        }
        Err(e) => record_failure(source, criterion, &e, sink, summary),
    }
}

fn record_failure(
    source: &Path,
    criterion: Criterion,
    error: &RankError,
    sink: &dyn EventSink,
    summary: &mut AnalyzeSummary,
) {
    sink.record(&PipelineEvent::RankingFailed {
        source: source.to_path_buf(),
        criterion,
        error: error.to_string(),
    });
    summary
        .failures
        .push((source.to_path_buf(), criterion, error.to_string()));
}

/// Regular files in `dir` whose names end in `.csv`, sorted by name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, StageError> {
    let list_err = |e| StageError::ListDir {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_csv_name(&name) {
            continue;
        }
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
