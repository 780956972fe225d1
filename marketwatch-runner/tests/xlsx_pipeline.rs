//! Convert then analyze, starting from real `.xlsx` workbooks read through
//! `CalamineLoader`. Fixtures are shared with `marketwatch-core`.

use marketwatch_core::{CalamineLoader, DateRange, NullSink, TiePolicy};
use marketwatch_runner::{analyze_stage, convert_range, AnalyzeOptions, ConvertOptions};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../marketwatch-core/tests/fixtures")
        .join(name)
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn ranked_symbols(path: &Path) -> Vec<String> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect()
}

fn symbols(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|i| format!("S{i:02}")).collect()
}

#[test]
fn workbooks_flow_through_convert_and_analyze() {
    let tmp = tempfile::tempdir().unwrap();
    let stage = tmp.path().join("stage");
    let data = tmp.path().join("data");
    fs::create_dir(&stage).unwrap();

    // Thu 01-04: weekend. Fri 01-05: absent. Sat 01-06: data. Sun 01-07: header only.
    fs::copy(fixture("market_watch.xlsx"), stage.join("2024-01-04.xlsx")).unwrap();
    fs::copy(fixture("market_watch.xlsx"), stage.join("2024-01-06.xlsx")).unwrap();
    fs::copy(fixture("header_only.xlsx"), stage.join("2024-01-07.xlsx")).unwrap();

    let opts = ConvertOptions {
        delete_workbook: true,
        ..ConvertOptions::new(&stage)
    };
    let range = DateRange::parse("2024-01-04", "2024-01-07").unwrap();

    let converted = convert_range(&CalamineLoader, &range, &opts, &NullSink).unwrap();

    assert_eq!(converted.weekend_discarded, 1);
    assert_eq!(converted.missing, 1);
    assert_eq!(converted.empty_discarded, 1);
    assert_eq!(converted.removed, 1);
    assert_eq!(listing(&stage), vec!["2024-01-06.csv"]);

    let csv = fs::read_to_string(stage.join("2024-01-06.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 15);
    assert_eq!(lines[2], "نماد,نام,تعداد معاملات,ارزش معاملات,بیشترین قیمت");
    assert_eq!(lines[3], "S01,N1,1,1200,1001");
    assert_eq!(lines[13], "S11,N11,11,300,1011");

    let analyzed = analyze_stage(
        &AnalyzeOptions {
            stage_dir: stage.clone(),
            data_dir: data.clone(),
            ties: TiePolicy::IncludeAll,
        },
        &NullSink,
    )
    .unwrap();

    assert!(analyzed.all_succeeded());
    assert_eq!(analyzed.files, 1);
    assert_eq!(
        listing(&data),
        vec![
            "top-symbols-max-most-2024-01-06.csv",
            "top-symbols-quantity-number-2024-01-06.csv",
            "top-symbols-values-value-2024-01-06.csv",
        ]
    );

    // S10 and S11 tie at the tenth value, so both stay.
    assert_eq!(
        ranked_symbols(&data.join("top-symbols-values-value-2024-01-06.csv")),
        symbols(1..=11)
    );
    let mut top_max = symbols(3..=12);
    top_max.reverse();
    assert_eq!(
        ranked_symbols(&data.join("top-symbols-max-most-2024-01-06.csv")),
        top_max
    );
    assert_eq!(
        ranked_symbols(&data.join("top-symbols-quantity-number-2024-01-06.csv")),
        top_max
    );
}
