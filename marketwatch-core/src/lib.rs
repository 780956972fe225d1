//! Market Watch Core — dates, staging layout, workbook source, table
//! conversion and top-N ranking.
//!
//! This crate holds everything the three pipeline stages share:
//! - Inclusive date ranges and the weekend set
//! - Staging-directory naming conventions and defaults
//! - The remote workbook source (blocking HTTP)
//! - Workbook loading and CSV export
//! - Column lookup and tie-aware top-N ranking
//! - Pipeline events and the `tracing` sink they are reported through

pub mod dates;
pub mod events;
pub mod layout;
pub mod ranking;
pub mod source;
pub mod workbook;

pub use dates::{DateRange, RangeError, WeekendSet};
pub use events::{EventSink, NullSink, PipelineEvent, Severity, Stage, TracingSink};
pub use ranking::{find_column, rank_file, rank_table, Criterion, RankError, StageTable, TiePolicy};
pub use source::{FetchError, MarketWatchClient, WorkbookSource};
pub use workbook::{CalamineLoader, TableError, WorkbookLoader, WorkbookTable};
