//! Log-file setup. One test binary holds one global subscriber, so every
//! check lives in a single test.

use marketwatch_cli::init_logging;
use marketwatch_core::{EventSink, PipelineEvent, Stage, TracingSink};
use std::fs;

#[test]
fn appends_plain_lines_and_refuses_second_install() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("info.log");
    fs::write(&path, "earlier run\n").unwrap();

    init_logging(&path).unwrap();

    TracingSink.record(&PipelineEvent::StageFailed {
        stage: Stage::Fetcher,
        op: "download_workbook",
        error: "HTTP 503".to_string(),
    });

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("earlier run\n"), "{text}");
    assert!(text.contains("ERROR"), "{text}");
    assert!(text.contains("fetcher"), "{text}");
    assert!(text.contains("download_workbook"), "{text}");
    assert!(text.contains("HTTP 503"), "{text}");
    assert!(!text.contains('\u{1b}'), "ANSI escapes in log file: {text}");

    assert!(init_logging(&path).is_err());
}

#[test]
fn unopenable_log_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = init_logging(&tmp.path().join("missing").join("info.log")).unwrap_err();
    assert!(err.to_string().contains("failed to open log file"), "{err}");
}
