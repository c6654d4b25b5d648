use qreport_core::summary::metric;
use qreport_core::table::read_csv;
use qreport_core::{
    extract, report, ExtractConfig, Extraction, Headline, MetricValue, ReportConfig,
    ReportInputs, TableKind,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn extract_config(out: &Path) -> ExtractConfig {
    ExtractConfig::new(
        fixture("pytest.xml"),
        fixture("coverage.xml"),
        fixture("ruff.json"),
    )
    .with_out_dir(out)
}

fn fixed_report_config(input: &Path, output: &Path) -> ReportConfig {
    ReportConfig {
        generated_at: chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0)),
        ..ReportConfig::with_dirs(input, output)
    }
}

#[test]
fn extract_writes_five_tables() {
    let dir = tempdir().unwrap();
    let csv_dir = dir.path().join("out_csv");
    let outcome = extract::run(&extract_config(&csv_dir)).unwrap();

    assert_eq!(outcome.files.len(), 5);
    for kind in TableKind::ALL {
        let t = read_csv(&csv_dir.join(kind.file_name())).unwrap();
        assert_eq!(t.headers, kind.headers(), "{kind} headers");
    }

    let summary = fs::read_to_string(csv_dir.join("summary.csv")).unwrap();
    assert_eq!(
        summary,
        "metric,value\n\
         tests_total,6\n\
         tests_passed,3\n\
         tests_failed,2\n\
         tests_skipped,1\n\
         tests_time_sec,0.412\n\
         coverage_percent,81.67\n\
         lint_issues,6\n"
    );

    let tests = read_csv(&csv_dir.join("tests.csv")).unwrap();
    assert_eq!(tests.len(), 6);
    assert_eq!(
        tests.column("status").collect::<Vec<_>>(),
        ["ok", "ok", "failure", "error", "skipped", "ok"]
    );
    assert_eq!(tests.rows[5][3], "0.0001");

    let top = read_csv(&csv_dir.join("lint_top5.csv")).unwrap();
    assert_eq!(top.rows[0], ["1", "F401", "3"]);
    assert_eq!(
        top.column("rule").collect::<Vec<_>>(),
        ["F401", "E501", "E741", "NA"]
    );
}

#[test]
fn report_round_trip_matches_parsed_values() {
    let dir = tempdir().unwrap();
    let csv_dir = dir.path().join("out_csv");
    let config = extract_config(&csv_dir);
    let parsed = Extraction::load(&config).unwrap();
    extract::run(&config).unwrap();

    let inputs = ReportInputs::load(&csv_dir).unwrap();
    let headline = Headline::from_inputs(&inputs);
    let direct = parsed.summary();

    assert_eq!(
        Some(&MetricValue::Int(headline.tests_total)),
        direct.get(metric::TESTS_TOTAL)
    );
    assert_eq!(
        Some(&MetricValue::Int(headline.tests_failed)),
        direct.get(metric::TESTS_FAILED)
    );
    assert_eq!(
        Some(&MetricValue::Float(headline.coverage_percent)),
        direct.get(metric::COVERAGE_PERCENT)
    );
    assert_eq!(
        Some(&MetricValue::Int(headline.lint_issues)),
        direct.get(metric::LINT_ISSUES)
    );
    assert_eq!(
        parsed.tests.total,
        parsed.tests.failures + parsed.tests.errors + parsed.tests.skipped + headline.tests_passed
    );
}

#[test]
fn report_writes_both_artifacts() {
    let dir = tempdir().unwrap();
    let csv_dir = dir.path().join("out_csv");
    let out_dir = dir.path().join("out");
    extract::run(&extract_config(&csv_dir)).unwrap();

    let outcome = report::run(&fixed_report_config(&csv_dir, &out_dir)).unwrap();
    assert_eq!(outcome.workbook, out_dir.join("quality_summary.xlsx"));
    assert_eq!(outcome.document, out_dir.join("quality_report.docx"));
    for p in [&outcome.workbook, &outcome.document] {
        let bytes = fs::read(p).unwrap();
        assert!(bytes.starts_with(b"PK"), "{} is not a zip container", p.display());
    }
    assert_eq!(outcome.headline.tests_total, 6);
    assert_eq!(outcome.headline.pass_rate(), 50.0);
}

#[test]
fn missing_table_aborts_without_output() {
    let dir = tempdir().unwrap();
    let csv_dir = dir.path().join("out_csv");
    let out_dir = dir.path().join("out");
    extract::run(&extract_config(&csv_dir)).unwrap();
    fs::remove_file(csv_dir.join("coverage_files.csv")).unwrap();

    let err = report::run(&fixed_report_config(&csv_dir, &out_dir)).unwrap_err();
    assert!(err.is_missing_input());
    assert!(err.to_string().contains("coverage_files.csv"));
    assert!(!out_dir.exists(), "no partial artifacts on failure");
}

#[test]
fn empty_lint_file_yields_zero_issues() {
    let dir = tempdir().unwrap();
    let ruff = dir.path().join("ruff.json");
    fs::write(&ruff, "").unwrap();
    let csv_dir = dir.path().join("out_csv");
    let config = ExtractConfig {
        lint: ruff.clone(),
        ..extract_config(&csv_dir)
    };

    let outcome = extract::run(&config).unwrap();
    assert_eq!(
        outcome.summary.get(metric::LINT_ISSUES),
        Some(&MetricValue::Int(0))
    );
    assert_eq!(
        fs::read_to_string(csv_dir.join("lint_top5.csv")).unwrap(),
        "rank,rule,count\n"
    );

    fs::write(&ruff, "[]").unwrap();
    extract::run(&config).unwrap();
    assert_eq!(
        fs::read_to_string(csv_dir.join("lint_top5.csv")).unwrap(),
        "rank,rule,count\n"
    );
}

#[test]
fn malformed_junit_fails_extraction_before_writing() {
    let dir = tempdir().unwrap();
    let junit = dir.path().join("pytest.xml");
    fs::write(&junit, "<testsuite><testcase></testsuite>").unwrap();
    let csv_dir = dir.path().join("out_csv");
    let config = ExtractConfig {
        junit,
        ..extract_config(&csv_dir)
    };

    let err = extract::run(&config).unwrap_err();
    assert_eq!(err.kind(), qreport_core::ErrorKind::MalformedInput);
    assert!(!csv_dir.exists());
}

#[test]
fn missing_coverage_file_is_missing_input() {
    let dir = tempdir().unwrap();
    let config = ExtractConfig {
        coverage: dir.path().join("coverage.xml"),
        ..extract_config(&dir.path().join("out_csv"))
    };
    assert!(extract::run(&config).unwrap_err().is_missing_input());
}

#[test]
fn non_numeric_coverage_does_not_abort_report() {
    let dir = tempdir().unwrap();
    let csv_dir = dir.path().join("out_csv");
    extract::run(&extract_config(&csv_dir)).unwrap();
    fs::write(
        csv_dir.join("coverage_files.csv"),
        "filename,coverage_percent\na.py,N/A\nb.py,42.5\n",
    )
    .unwrap();
    fs::write(
        csv_dir.join("summary.csv"),
        "metric,value\ntests_total,6\ncoverage_percent,N/A\n",
    )
    .unwrap();

    let outcome = report::run(&fixed_report_config(&csv_dir, &dir.path().join("out"))).unwrap();
    assert_eq!(outcome.headline.coverage_percent, 0.0);
    assert_eq!(outcome.headline.tests_total, 6);
}

#[test]
fn failed_document_write_leaves_no_workbook() {
    let dir = tempdir().unwrap();
    let csv_dir = dir.path().join("out_csv");
    let out_dir = dir.path().join("out");
    extract::run(&extract_config(&csv_dir)).unwrap();
    fs::create_dir_all(out_dir.join("quality_report.docx")).unwrap();

    let err = report::run(&fixed_report_config(&csv_dir, &out_dir)).unwrap_err();
    assert_eq!(err.kind(), qreport_core::ErrorKind::Io);
    assert!(err.to_string().contains("quality_report.docx"));
    assert!(!out_dir.join("quality_summary.xlsx").exists());

    let left: Vec<_> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(left, ["quality_report.docx"], "staged files are cleaned up");
}
