//! `converter <start_date> <end_date> [--output_dir DIR] [--delete_excel]`

use anyhow::Result;
use clap::Parser;
use marketwatch_cli::{finish, init_logging, ConverterArgs};
use marketwatch_core::{CalamineLoader, Stage, TracingSink, WeekendSet};
use marketwatch_runner::{convert_range, ConvertOptions};
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    let args = ConverterArgs::parse();
    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    finish(Stage::Converter, run(&args))
}

fn run(args: &ConverterArgs) -> Result<bool> {
    let range = args.range()?;
    let opts = ConvertOptions {
        dir: args.output_dir.clone(),
        delete_workbook: args.delete_excel,
        weekend: WeekendSet::default(),
    };
    info!(
        stage = "converter",
        op = "main",
        "converting {} day(s) from {} to {} in {}, weekend {:?}",
        range.day_count(),
        range.start(),
        range.end(),
        opts.dir.display(),
        opts.weekend.days()
    );

    let summary = convert_range(&CalamineLoader, &range, &opts, &TracingSink)?;

    info!(
        stage = "converter",
        op = "main",
        "converted {}, weekend {}, empty {}, missing {}, removed {}",
        summary.converted.len(),
        summary.weekend_discarded,
        summary.empty_discarded,
        summary.missing,
        summary.removed
    );
    Ok(true)
}
