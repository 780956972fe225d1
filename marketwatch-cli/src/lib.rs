//! Shared plumbing for the `fetcher`, `converter` and `analyzer` binaries:
//! argument definitions, log-file setup and the exit-code mapping.

pub mod args;
pub mod logging;

pub use args::{AnalyzerArgs, ConverterArgs, FetcherArgs};
pub use logging::init_logging;

use marketwatch_core::Stage;
use std::process::ExitCode;

/// Map a stage run to the process exit code.
///
/// `Ok(true)` is a clean run, `Ok(false)` a run that completed with
/// recorded failures. An error is logged once more at the top level.
pub fn finish(stage: Stage, outcome: anyhow::Result<bool>) -> ExitCode {
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(
                stage = stage.as_str(),
                op = "main",
                "An unexpected error occurred: {e:#}"
            );
            ExitCode::FAILURE
        }
    }
}
