//! Pipeline events and the sink they are reported to.
//!
//! Stages never log directly. They emit [`PipelineEvent`]s into an injected
//! [`EventSink`]; the binaries wire in [`TracingSink`], tests wire in a
//! recorder. Each event knows its stage, the operation it came from, and its
//! severity, which together form the `(stage, op, message)` triple that ends
//! up in the log file.

use crate::ranking::Criterion;
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// The three pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Fetcher,
    Converter,
    Analyzer,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Fetcher => "fetcher",
            Stage::Converter => "converter",
            Stage::Analyzer => "analyzer",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Something a stage did or failed to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    WorkbookSaved {
        date: NaiveDate,
        path: PathBuf,
        bytes: usize,
    },
    WorkbookMissing {
        date: NaiveDate,
        path: PathBuf,
    },
    WeekendDiscarded {
        date: NaiveDate,
        path: PathBuf,
    },
    EmptyDiscarded {
        date: NaiveDate,
        path: PathBuf,
    },
    CsvWritten {
        date: NaiveDate,
        path: PathBuf,
        rows: usize,
    },
    WorkbookRemoved {
        date: NaiveDate,
        path: PathBuf,
    },
    /// A converted table was read; carries its header and first rows.
    TableLoaded {
        source: PathBuf,
        columns: Vec<String>,
        preview: Vec<Vec<String>>,
        rows: usize,
    },
    RankingWritten {
        source: PathBuf,
        criterion: Criterion,
        path: PathBuf,
        rows: usize,
    },
    ColumnMissing {
        source: PathBuf,
        criterion: Criterion,
        column: String,
    },
    RankingFailed {
        source: PathBuf,
        criterion: Criterion,
        error: String,
    },
    /// A stage-aborting failure, reported right before the error propagates.
    StageFailed {
        stage: Stage,
        op: &'static str,
        error: String,
    },
}

impl PipelineEvent {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineEvent::WorkbookSaved { .. } => Stage::Fetcher,
            PipelineEvent::WorkbookMissing { .. }
            | PipelineEvent::WeekendDiscarded { .. }
            | PipelineEvent::EmptyDiscarded { .. }
            | PipelineEvent::CsvWritten { .. }
            | PipelineEvent::WorkbookRemoved { .. } => Stage::Converter,
            PipelineEvent::TableLoaded { .. }
            | PipelineEvent::RankingWritten { .. }
            | PipelineEvent::ColumnMissing { .. }
            | PipelineEvent::RankingFailed { .. } => Stage::Analyzer,
            PipelineEvent::StageFailed { stage, .. } => *stage,
        }
    }

    /// Name of the operation that produced the event.
    pub fn op(&self) -> &'static str {
        match self {
            PipelineEvent::WorkbookSaved { .. } => "save_workbook",
            PipelineEvent::WorkbookMissing { .. } | PipelineEvent::WeekendDiscarded { .. } => {
                "convert_day"
            }
            PipelineEvent::EmptyDiscarded { .. }
            | PipelineEvent::CsvWritten { .. }
            | PipelineEvent::WorkbookRemoved { .. } => "save_csv",
            PipelineEvent::TableLoaded { .. } => "load_csv",
            PipelineEvent::RankingWritten { .. }
            | PipelineEvent::ColumnMissing { .. }
            | PipelineEvent::RankingFailed { .. } => "analyze_csv",
            PipelineEvent::StageFailed { op, .. } => *op,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            PipelineEvent::WorkbookSaved { .. }
            | PipelineEvent::WeekendDiscarded { .. }
            | PipelineEvent::CsvWritten { .. }
            | PipelineEvent::WorkbookRemoved { .. }
            | PipelineEvent::TableLoaded { .. }
            | PipelineEvent::RankingWritten { .. } => Severity::Info,
            PipelineEvent::EmptyDiscarded { .. } => Severity::Warn,
            PipelineEvent::WorkbookMissing { .. }
            | PipelineEvent::ColumnMissing { .. }
            | PipelineEvent::RankingFailed { .. }
            | PipelineEvent::StageFailed { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::WorkbookSaved { path, bytes, .. } => {
                write!(f, "workbook saved to '{}' ({bytes} bytes)", path.display())
            }
            PipelineEvent::WorkbookMissing { path, .. } => {
                write!(f, "file not found: {}", path.display())
            }
            PipelineEvent::WeekendDiscarded { date, path } => {
                write!(f, "{date} is a weekend day, deleted {}", path.display())
            }
            PipelineEvent::EmptyDiscarded { path, .. } => {
                write!(f, "empty file: {}, deleted", path.display())
            }
            PipelineEvent::CsvWritten { path, rows, .. } => {
                write!(f, "CSV file '{}' saved ({rows} rows)", path.display())
            }
            PipelineEvent::WorkbookRemoved { path, .. } => {
                write!(f, "removed converted workbook {}", path.display())
            }
            PipelineEvent::TableLoaded {
                source,
                columns,
                preview,
                rows,
            } => {
                write!(
                    f,
                    "loaded {} ({rows} rows), first rows:\n{}",
                    source.display(),
                    columns.join(" | ")
                )?;
                for row in preview {
                    write!(f, "\n{}", row.join(" | "))?;
                }
                Ok(())
            }
            PipelineEvent::RankingWritten {
                criterion,
                path,
                rows,
                ..
            } => write!(
                f,
                "top symbols by '{}' saved to {} ({rows} rows)",
                criterion.needle(),
                path.display()
            ),
            PipelineEvent::ColumnMissing { source, column, .. } => write!(
                f,
                "'{column}' column not found in {}, skipping",
                source.display()
            ),
            PipelineEvent::RankingFailed {
                source,
                criterion,
                error,
            } => write!(
                f,
                "ranking by '{}' failed for {}: {error}",
                criterion.needle(),
                source.display()
            ),
            PipelineEvent::StageFailed { error, .. } => f.write_str(error),
        }
    }
}

/// Receives pipeline events. Implementations decide where they go.
pub trait EventSink {
    fn record(&self, event: &PipelineEvent);
}

/// Forwards events to `tracing` at the event's severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &PipelineEvent) {
        let stage = event.stage().as_str();
        let op = event.op();
        match event.severity() {
            Severity::Info => tracing::info!(stage, op, "{event}"),
            Severity::Warn => tracing::warn!(stage, op, "{event}"),
            Severity::Error => tracing::error!(stage, op, "{event}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &PipelineEvent) {}
}
