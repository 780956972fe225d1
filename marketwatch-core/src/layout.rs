//! Directory and file naming conventions shared by all three stages.
//!
//! Layout:
//! - `{stage}/{YYYY-MM-DD}.xlsx` — downloaded workbook (transient)
//! - `{stage}/{YYYY-MM-DD}.csv` — converted table (intermediate)
//! - `{data}/{prefix}-{criterion}-{YYYY-MM-DD}.csv` — ranking output

use crate::dates::DATE_FORMAT;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const DEFAULT_STAGE_DIR: &str = "stage";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_FILE: &str = "info.log";

/// Market-watch export endpoint; the trading date goes in the `d` query parameter.
pub const DEFAULT_BASE_URL: &str = "http://members.tsetmc.com/tsev2/excel/MarketWatchPlus.aspx";

pub const WORKBOOK_EXTENSION: &str = "xlsx";
pub const CSV_EXTENSION: &str = "csv";

/// File stem for a trading date: `YYYY-MM-DD`.
pub fn date_stem(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `{dir}/{YYYY-MM-DD}.xlsx`
pub fn workbook_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{WORKBOOK_EXTENSION}", date_stem(date)))
}

/// `{dir}/{YYYY-MM-DD}.csv`
pub fn csv_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{CSV_EXTENSION}", date_stem(date)))
}

/// True when the file name ends with `.csv`.
pub fn is_csv_name(name: &str) -> bool {
    name.ends_with(&format!(".{CSV_EXTENSION}"))
}
