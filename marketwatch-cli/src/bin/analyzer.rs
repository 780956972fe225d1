//! `analyzer` — rank every staged CSV by value, max price and trade count.

use anyhow::Result;
use clap::Parser;
use marketwatch_cli::{finish, init_logging, AnalyzerArgs};
use marketwatch_core::{Stage, TracingSink};
use marketwatch_runner::{analyze_stage, AnalyzeOptions};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = AnalyzerArgs::parse();
    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    finish(Stage::Analyzer, run(&args))
}

fn run(args: &AnalyzerArgs) -> Result<bool> {
    let opts = AnalyzeOptions {
        stage_dir: args.stage_dir.clone(),
        data_dir: args.data_dir.clone(),
        ties: args.ties(),
    };

    let summary = analyze_stage(&opts, &TracingSink)?;

    info!(
        stage = "analyzer",
        op = "main",
        "ranked {} file(s): {} written, {} missing column(s), {} failure(s)",
        summary.files,
        summary.written.len(),
        summary.missing_columns,
        summary.failures.len()
    );
    if !summary.all_succeeded() {
        for (path, criterion, err) in &summary.failures {
            error!(
                stage = "analyzer",
                op = "main",
                "{} [{criterion}]: {err}",
                path.display()
            );
        }
    }
    Ok(summary.all_succeeded())
}
