//! Command-line arguments for each binary.

use clap::Parser;
use marketwatch_core::layout::{
    DEFAULT_BASE_URL, DEFAULT_DATA_DIR, DEFAULT_LOG_FILE, DEFAULT_STAGE_DIR,
};
use marketwatch_core::{DateRange, RangeError, TiePolicy};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "fetcher",
    about = "Download one market-watch workbook per day into the stage directory"
)]
pub struct FetcherArgs {
    /// First day to fetch (YYYY-MM-DD).
    pub start_date: String,

    /// Last day to fetch, inclusive (YYYY-MM-DD).
    pub end_date: String,

    /// Directory the workbooks are saved into.
    #[arg(long, default_value = DEFAULT_STAGE_DIR)]
    pub stage_dir: PathBuf,

    /// Endpoint the `?d=<date>` query is appended to.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log file, appended to.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl FetcherArgs {
    pub fn range(&self) -> Result<DateRange, RangeError> {
        DateRange::parse(&self.start_date, &self.end_date)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "converter",
    about = "Convert staged workbooks to CSV, dropping weekend and empty days"
)]
pub struct ConverterArgs {
    /// First day to convert (YYYY-MM-DD).
    pub start_date: String,

    /// Last day to convert, inclusive (YYYY-MM-DD).
    pub end_date: String,

    /// Directory holding the workbooks; CSVs are written here too.
    #[arg(long = "output_dir", visible_alias = "output-dir", default_value = DEFAULT_STAGE_DIR)]
    pub output_dir: PathBuf,

    /// Delete each workbook once its CSV is written.
    #[arg(long = "delete_excel", visible_alias = "delete-excel", default_value_t = false)]
    pub delete_excel: bool,

    /// Log file, appended to.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl ConverterArgs {
    pub fn range(&self) -> Result<DateRange, RangeError> {
        DateRange::parse(&self.start_date, &self.end_date)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "analyzer",
    about = "Write top-10 rankings by value, max price and trade count for each staged CSV"
)]
pub struct AnalyzerArgs {
    /// Directory the CSVs are read from.
    #[arg(long, default_value = DEFAULT_STAGE_DIR)]
    pub stage_dir: PathBuf,

    /// Directory the rankings are written to.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Cut rankings at exactly ten rows instead of keeping every tie.
    #[arg(long, default_value_t = false)]
    pub truncate_ties: bool,

    /// Log file, appended to.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl AnalyzerArgs {
    pub fn ties(&self) -> TiePolicy {
        if self.truncate_ties {
            TiePolicy::Truncate
        } else {
            TiePolicy::IncludeAll
        }
    }
}
