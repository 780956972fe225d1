//! Top-N rankings over a converted market-watch table.
//!
//! A ranking is defined by a [`Criterion`]: a header substring that locates
//! the numeric column, a short mapped name, and an output prefix. The table
//! is read with the first two records skipped (title rows above the real
//! header), the criterion column is coerced to `f64`, and the largest rows are
//! projected to `(symbol, criterion)` and written back out as CSV.

use crate::layout::CSV_EXTENSION;
use polars::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identifier column every ranking is projected onto.
pub const SYMBOL_COLUMN: &str = "نماد";

/// Records above the real header in a converted table.
pub const HEADER_SKIP_ROWS: usize = 2;

/// Rows kept per ranking before tie expansion.
pub const TOP_N: usize = 10;

/// Errors from a single (file, criterion) ranking.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("'{column}' column not found")]
    MissingColumn { column: String },

    #[error("{path} has no header row after skipping {skipped} rows")]
    NoHeader { path: PathBuf, skipped: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RankError {
    /// Missing columns are expected for some files; everything else is a failure.
    pub fn is_missing_column(&self) -> bool {
        matches!(self, RankError::MissingColumn { .. })
    }
}

/// The three fixed ranking criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Traded value.
    Value,
    /// Maximum price of the day.
    Max,
    /// Number of trades.
    Quantity,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [Criterion::Value, Criterion::Max, Criterion::Quantity];

    /// Substring that identifies the criterion's column in the header.
    pub fn needle(self) -> &'static str {
        match self {
            Criterion::Value => "ارزش",
            Criterion::Max => "بیشترین",
            Criterion::Quantity => "تعداد",
        }
    }

    /// Latin name used in output file names.
    pub fn mapped_name(self) -> &'static str {
        match self {
            Criterion::Value => "value",
            Criterion::Max => "most",
            Criterion::Quantity => "number",
        }
    }

    pub fn output_prefix(self) -> &'static str {
        match self {
            Criterion::Value => "top-symbols-values",
            Criterion::Max => "top-symbols-max",
            Criterion::Quantity => "top-symbols-quantity",
        }
    }

    /// `{prefix}-{mapped}-{source_name}`
    pub fn output_file_name(self, source_name: &str) -> String {
        format!(
            "{}-{}-{source_name}",
            self.output_prefix(),
            self.mapped_name()
        )
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mapped_name())
    }
}

/// How rows tied with the N-th value are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    /// Keep every row equal to the N-th value; the result may exceed N.
    #[default]
    IncludeAll,
    /// Stop at exactly N rows; among ties, earlier rows win.
    Truncate,
}

/// Index of the first column whose name contains `needle`.
pub fn find_column<S: AsRef<str>>(columns: &[S], needle: &str) -> Option<usize> {
    columns.iter().position(|c| c.as_ref().contains(needle))
}

/// Header and rows of a converted CSV, read after the skipped title records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl StageTable {
    /// Read `path`, skip `skip` records, and take the next one as the header.
    pub fn read(path: &Path, skip: usize) -> Result<Self, RankError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut records = reader.records().skip(skip);
        let columns: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(|c| c.trim().to_string()).collect(),
            None => {
                return Err(RankError::NoHeader {
                    path: path.to_path_buf(),
                    skipped: skip,
                })
            }
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    /// The first `n` data rows.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row].get(col).map(String::as_str).unwrap_or("")
    }

    /// Build the two-column frame `(symbol, criterion)` with the criterion
    /// coerced to `f64`. Unparsable cells and NaN become null.
    pub fn ranking_frame(&self, criterion: Criterion) -> Result<DataFrame, RankError> {
        let value_idx =
            find_column(&self.columns, criterion.needle()).ok_or_else(|| RankError::MissingColumn {
                column: criterion.needle().to_string(),
            })?;
        let symbol_idx = self
            .columns
            .iter()
            .position(|c| c == SYMBOL_COLUMN)
            .ok_or_else(|| RankError::MissingColumn {
                column: SYMBOL_COLUMN.to_string(),
            })?;

        let value_name = self.columns[value_idx].as_str();
        let symbols: Vec<String> = (0..self.rows.len())
            .map(|r| self.cell(r, symbol_idx).to_string())
            .collect();
        let raw: Vec<String> = (0..self.rows.len())
            .map(|r| self.cell(r, value_idx).trim().to_string())
            .collect();

        let coerced = Column::new(value_name.into(), raw).cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = coerced
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();

        Ok(DataFrame::new(vec![
            Column::new(SYMBOL_COLUMN.into(), symbols),
            Column::new(value_name.into(), values),
        ])?)
    }
}

/// Number of leading rows to keep from values sorted descending with nulls
/// last.
pub fn ranked_len(sorted: &[Option<f64>], n: usize, ties: TiePolicy) -> usize {
    let present = sorted.iter().take_while(|v| v.is_some()).count();
    if n == 0 {
        return 0;
    }
    if present <= n {
        return present;
    }
    match (ties, sorted[n - 1]) {
        (TiePolicy::IncludeAll, Some(cutoff)) => {
            n + sorted[n..present]
                .iter()
                .take_while(|v| **v == Some(cutoff))
                .count()
        }
        _ => n,
    }
}

/// Sort a ranking frame by its criterion column (descending, stable, nulls
/// last) and keep the top `n` rows under `ties`.
pub fn top_rows(frame: &DataFrame, n: usize, ties: TiePolicy) -> Result<DataFrame, RankError> {
    let names = frame.get_column_names_owned();
    let Some(value_name) = names.get(1).cloned() else {
        return Ok(frame.clone());
    };

    let sorted = frame.sort(
        [value_name.clone()],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )?;

    let values: Vec<Option<f64>> = sorted.column(value_name.as_str())?.f64()?.into_iter().collect();
    let keep = ranked_len(&values, n, ties);
    Ok(sorted.head(Some(keep)))
}

/// Write a ranking frame as CSV with a header row.
pub fn write_ranking(frame: &mut DataFrame, path: &Path) -> Result<(), RankError> {
    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;
    Ok(())
}

/// Rank one converted table by one criterion and write the result into
/// `data_dir`. Returns the written path and the number of ranked rows.
pub fn rank_file(
    source: &Path,
    criterion: Criterion,
    data_dir: &Path,
    ties: TiePolicy,
) -> Result<(PathBuf, usize), RankError> {
    let table = StageTable::read(source, HEADER_SKIP_ROWS)?;
    rank_table(&table, source, criterion, data_dir, ties)
}

/// Rank an already-read table. `source` only names the output file.
pub fn rank_table(
    table: &StageTable,
    source: &Path,
    criterion: Criterion,
    data_dir: &Path,
    ties: TiePolicy,
) -> Result<(PathBuf, usize), RankError> {
    let frame = table.ranking_frame(criterion)?;
    let mut top = top_rows(&frame, TOP_N, ties)?;

    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("unnamed.{CSV_EXTENSION}"));
    let out_path = data_dir.join(criterion.output_file_name(&source_name));
    write_ranking(&mut top, &out_path)?;
    Ok((out_path, top.height()))
}
