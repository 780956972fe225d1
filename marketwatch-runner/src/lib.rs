//! Market Watch Runner — the three stage drivers.
//!
//! Built on `marketwatch-core`:
//! - `fetch_range`: download one workbook per calendar day
//! - `convert_range`: workbook → CSV, discarding weekend and empty days
//! - `analyze_stage`: top-N rankings per CSV and criterion
//!
//! Every driver reports through an injected `EventSink` and returns a
//! summary. Stage-aborting failures are reported as `StageFailed` before the
//! error is returned.

pub mod analyze;
pub mod convert;
pub mod error;
pub mod fetch;

pub use analyze::{analyze_stage, AnalyzeOptions, AnalyzeSummary};
pub use convert::{convert_range, plan_day, ConvertOptions, ConvertSummary, DayAction, DayOutcome};
pub use error::StageError;
pub use fetch::{fetch_range, FetchSummary};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn summaries_are_send_sync() {
        assert_send::<FetchSummary>();
        assert_sync::<FetchSummary>();
        assert_send::<ConvertSummary>();
        assert_sync::<ConvertSummary>();
        assert_send::<AnalyzeSummary>();
        assert_sync::<AnalyzeSummary>();
    }

    #[test]
    fn options_and_errors_are_send_sync() {
        assert_send::<ConvertOptions>();
        assert_sync::<ConvertOptions>();
        assert_send::<AnalyzeOptions>();
        assert_sync::<AnalyzeOptions>();
        assert_send::<StageError>();
        assert_sync::<StageError>();
    }
}
