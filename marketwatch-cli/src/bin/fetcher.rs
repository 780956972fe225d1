//! `fetcher <start_date> <end_date>`: download one workbook per calendar day.

use anyhow::Result;
use clap::Parser;
use marketwatch_cli::{finish, init_logging, FetcherArgs};
use marketwatch_core::{MarketWatchClient, Stage, TracingSink, WorkbookSource};
use marketwatch_runner::fetch_range;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    let args = FetcherArgs::parse();
    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    finish(Stage::Fetcher, run(&args))
}

fn run(args: &FetcherArgs) -> Result<bool> {
    let range = args.range()?;
    let client = MarketWatchClient::new(args.base_url.as_str())?;
    info!(
        stage = "fetcher",
        op = "main",
        "fetching {} day(s) from {} to {} into {} via {} ({})",
        range.day_count(),
        range.start(),
        range.end(),
        args.stage_dir.display(),
        client.name(),
        client.base_url()
    );

    let summary = fetch_range(&client, &range, &args.stage_dir, &TracingSink)?;

    info!(
        stage = "fetcher",
        op = "main",
        "saved {} workbook(s), {} bytes",
        summary.saved.len(),
        summary.bytes
    );
    Ok(true)
}
