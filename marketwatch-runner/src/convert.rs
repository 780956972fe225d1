//! Convert stage: turn each trading day's workbook into a CSV.
//!
//! Per day the decision is:
//! - no workbook on disk → skip (reported, iteration continues)
//! - weekend day → delete the workbook unopened
//! - workbook with no data rows → delete it
//! - otherwise → write `{date}.csv` next to it, and delete the workbook if asked

use crate::error::StageError;
use chrono::NaiveDate;
use marketwatch_core::layout::{csv_path, workbook_path};
use marketwatch_core::{
    DateRange, EventSink, PipelineEvent, Stage, WeekendSet, WorkbookLoader,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for a convert run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory holding the workbooks; CSVs are written here too.
    pub dir: PathBuf,
    /// Delete each workbook after it has been converted.
    pub delete_workbook: bool,
    pub weekend: WeekendSet,
}

impl ConvertOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delete_workbook: false,
            weekend: WeekendSet::default(),
        }
    }
}

/// What to do with a day's workbook, before it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAction {
    Skip,
    Discard,
    Convert,
}

/// Decide a day's fate from its date and whether its workbook exists.
pub fn plan_day(date: NaiveDate, workbook_exists: bool, weekend: &WeekendSet) -> DayAction {
    if !workbook_exists {
        DayAction::Skip
    } else if weekend.contains(date) {
        DayAction::Discard
    } else {
        DayAction::Convert
    }
}

/// What actually happened to a day's workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    Missing,
    WeekendDiscarded,
    EmptyDiscarded,
    Converted { csv: PathBuf, removed_workbook: bool },
}

/// Outcome of a completed convert run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub converted: Vec<PathBuf>,
    pub weekend_discarded: usize,
    pub empty_discarded: usize,
    pub missing: usize,
    pub removed: usize,
}

impl ConvertSummary {
    fn absorb(&mut self, outcome: DayOutcome) {
        match outcome {
            DayOutcome::Missing => self.missing += 1,
            DayOutcome::WeekendDiscarded => self.weekend_discarded += 1,
            DayOutcome::EmptyDiscarded => self.empty_discarded += 1,
            DayOutcome::Converted {
                csv,
                removed_workbook,
            } => {
                self.converted.push(csv);
                if removed_workbook {
                    self.removed += 1;
                }
            }
        }
    }
}

/// Convert every day in `range`. Missing workbooks are skipped; the first
/// I/O or parse failure is reported and aborts the run.
pub fn convert_range(
    loader: &dyn WorkbookLoader,
    range: &DateRange,
    opts: &ConvertOptions,
    sink: &dyn EventSink,
) -> Result<ConvertSummary, StageError> {
    let result = convert_all(loader, range, opts, sink);
    if let Err(e) = &result {
        sink.record(&PipelineEvent::StageFailed {
            stage: Stage::Converter,
            op: e.op(),
            error: e.to_string(),
        });
    }
    result
}

fn convert_all(
    loader: &dyn WorkbookLoader,
    range: &DateRange,
    opts: &ConvertOptions,
    sink: &dyn EventSink,
) -> Result<ConvertSummary, StageError> {
    fs::create_dir_all(&opts.dir).map_err(|e| StageError::CreateDir {
        path: opts.dir.clone(),
        source: e,
    })?;

    let mut summary = ConvertSummary::default();
    for date in range.days() {
        let outcome = convert_day(loader, date, opts, sink)?;
        summary.absorb(outcome);
    }
    Ok(summary)
}

/// Apply the per-day decision for a single date.
pub fn convert_day(
    loader: &dyn WorkbookLoader,
    date: NaiveDate,
    opts: &ConvertOptions,
    sink: &dyn EventSink,
) -> Result<DayOutcome, StageError> {
    let path = workbook_path(&opts.dir, date);

    match plan_day(date, path.is_file(), &opts.weekend) {
        DayAction::Skip => {
            sink.record(&PipelineEvent::WorkbookMissing { date, path });
            Ok(DayOutcome::Missing)
        }
        DayAction::Discard => {
            remove(&path)?;
            sink.record(&PipelineEvent::WeekendDiscarded { date, path });
            Ok(DayOutcome::WeekendDiscarded)
        }
        DayAction::Convert => save_csv(loader, date, &path, opts, sink),
    }
}

fn save_csv(
    loader: &dyn WorkbookLoader,
    date: NaiveDate,
    path: &Path,
    opts: &ConvertOptions,
    sink: &dyn EventSink,
) -> Result<DayOutcome, StageError> {
    let table = loader.load(path).map_err(|e| StageError::Convert {
        path: path.to_path_buf(),
        source: e,
    })?;

    if table.is_empty() {
        remove(path)?;
        sink.record(&PipelineEvent::EmptyDiscarded {
            date,
            path: path.to_path_buf(),
        });
        return Ok(DayOutcome::EmptyDiscarded);
    }

    let csv = csv_path(&opts.dir, date);
    table.write_csv(&csv).map_err(|e| StageError::Convert {
        path: csv.clone(),
        source: e,
    })?;
    sink.record(&PipelineEvent::CsvWritten {
        date,
        path: csv.clone(),
        rows: table.rows.len(),
    });

    if opts.delete_workbook {
        remove(path)?;
        sink.record(&PipelineEvent::WorkbookRemoved {
            date,
            path: path.to_path_buf(),
        });
    }

    Ok(DayOutcome::Converted {
        csv,
        removed_workbook: opts.delete_workbook,
    })
}

fn remove(path: &Path) -> Result<(), StageError> {
    fs::remove_file(path).map_err(|e| StageError::Remove {
        path: path.to_path_buf(),
        source: e,
    })
}
