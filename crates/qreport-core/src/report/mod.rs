//! Reporting stage: CSV tables to a workbook and a narrative document.
//!
//! The stage reads its five tables from disk and nothing else. All inputs are
//! loaded and both artifacts rendered in memory before the output directory
//! is touched, so a failure leaves no partial output behind.

pub mod document;
pub mod workbook;

use crate::config::ReportConfig;
use crate::error::{QualityError, Result};
use crate::numeric::{coerce_f64, format_float, round_to};
use crate::summary::{metric, SummaryMetrics};
use crate::table::{read_csv, Table, TableKind};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The five tables as read back from the extraction output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportInputs {
    pub summary: Table,
    pub tests: Table,
    pub coverage_files: Table,
    pub lint: Table,
    pub lint_top5: Table,
}

impl ReportInputs {
    /// Read every table from `dir`. The first absent file aborts the load.
    pub fn load(dir: &Path) -> Result<Self> {
        for kind in TableKind::ALL {
            let path = dir.join(kind.file_name());
            if !path.is_file() {
                return Err(QualityError::missing(path));
            }
        }
        let read = |kind: TableKind| read_csv(&dir.join(kind.file_name()));
        Ok(Self {
            summary: read(TableKind::Summary)?,
            tests: read(TableKind::Tests)?,
            coverage_files: read(TableKind::CoverageFiles)?,
            lint: read(TableKind::Lint)?,
            lint_top5: read(TableKind::LintTop5)?,
        })
    }

    pub fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Summary => &self.summary,
            TableKind::Tests => &self.tests,
            TableKind::CoverageFiles => &self.coverage_files,
            TableKind::Lint => &self.lint,
            TableKind::LintTop5 => &self.lint_top5,
        }
    }

    pub fn summary_metrics(&self) -> SummaryMetrics {
        SummaryMetrics::from_table(&self.summary)
    }
}

/// Top-line figures for the executive summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub tests_total: i64,
    pub tests_passed: i64,
    pub tests_failed: i64,
    pub tests_skipped: i64,
    pub tests_time_sec: f64,
    pub coverage_percent: f64,
    pub lint_issues: i64,
}

impl Headline {
    /// Named metrics first; when a metric is absent, fall back to what the
    /// other tables show. Unparsable values count as zero.
    pub fn from_inputs(inputs: &ReportInputs) -> Self {
        let summary = inputs.summary_metrics();
        let number = |name: &str| summary.get(name).map(|v| v.as_f64());
        let count = |name: &str, fallback: usize| {
            number(name).map(|v| v as i64).unwrap_or(fallback as i64)
        };

        let statuses = StatusCounts::from_tests(&inputs.tests);
        Self {
            tests_total: count(metric::TESTS_TOTAL, inputs.tests.len()),
            tests_passed: count(metric::TESTS_PASSED, statuses.passed),
            tests_failed: count(metric::TESTS_FAILED, statuses.failed),
            tests_skipped: count(metric::TESTS_SKIPPED, statuses.skipped),
            tests_time_sec: number(metric::TESTS_TIME_SEC)
                .unwrap_or_else(|| inputs.tests.column("time_sec").map(coerce_f64).sum()),
            coverage_percent: number(metric::COVERAGE_PERCENT).unwrap_or(0.0),
            lint_issues: count(metric::LINT_ISSUES, inputs.lint.len()),
        }
    }

    /// Passed share of all tests in percent, 0 when there are no tests.
    pub fn pass_rate(&self) -> f64 {
        if self.tests_total <= 0 {
            return 0.0;
        }
        round_to(self.tests_passed as f64 * 100.0 / self.tests_total as f64, 2)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StatusCounts {
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl StatusCounts {
    fn from_tests(tests: &Table) -> Self {
        let mut c = StatusCounts::default();
        for status in tests.column("status") {
            match StatusClass::of(status) {
                StatusClass::Failed => c.failed += 1,
                StatusClass::Skipped => c.skipped += 1,
                StatusClass::Other if status.trim().eq_ignore_ascii_case("ok") => c.passed += 1,
                StatusClass::Other => {}
            }
        }
        c
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Failed,
    Skipped,
    Other,
}

impl StatusClass {
    /// Case-insensitive. `failure`, `error` and `failed` all count as failed.
    pub fn of(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "failure" | "error" | "failed" => StatusClass::Failed,
            "skipped" => StatusClass::Skipped,
            _ => StatusClass::Other,
        }
    }
}

/// Test cases split for the document.
#[derive(Debug, Clone, PartialEq)]
pub enum TestBreakdown {
    ByStatus {
        failed: Table,
        skipped: Table,
        other: Table,
    },
    /// No `status` column: nothing to split on.
    Unclassified(Table),
}

pub fn partition_tests(tests: &Table) -> TestBreakdown {
    let Some(idx) = tests.column_index("status") else {
        return TestBreakdown::Unclassified(tests.clone());
    };
    let class_of = |row: &[String]| StatusClass::of(&row[idx]);
    TestBreakdown::ByStatus {
        failed: tests.filter_rows(|r| class_of(r) == StatusClass::Failed),
        skipped: tests.filter_rows(|r| class_of(r) == StatusClass::Skipped),
        other: tests.filter_rows(|r| class_of(r) == StatusClass::Other),
    }
}

/// Highest and lowest covered files.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRanking {
    pub top: Table,
    pub bottom: Table,
}

/// Rank rows by `coverage_percent`, coerced to a float (0.0 when unparsable).
/// Equal values keep their table order. `None` when the column is absent.
pub fn rank_coverage(coverage: &Table, limit: usize) -> Option<CoverageRanking> {
    let idx = coverage.column_index("coverage_percent")?;
    let mut rows: Vec<(f64, Vec<String>)> = coverage
        .rows
        .iter()
        .map(|row| {
            let value = coerce_f64(&row[idx]);
            let mut row = row.clone();
            row[idx] = format_float(value);
            (value, row)
        })
        .collect();

    let pick = |rows: &[(f64, Vec<String>)]| Table {
        headers: coverage.headers.clone(),
        rows: rows.iter().take(limit).map(|(_, r)| r.clone()).collect(),
    };

    rows.sort_by(|a, b| b.0.total_cmp(&a.0));
    let top = pick(&rows);
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let bottom = pick(&rows);
    Some(CoverageRanking { top, bottom })
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub workbook: PathBuf,
    pub document: PathBuf,
    pub headline: Headline,
}

/// Write `bytes` to a hidden temporary file in `dir`. Dropped unpersisted, it is deleted.
fn stage(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".qreport-")
        .tempfile_in(dir)
        .map_err(|e| QualityError::from_io(dir, e))?;
    let path = tmp.path().to_path_buf();
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| QualityError::from_io(&path, e))?;
    Ok(tmp)
}

/// Run the reporting stage end to end.
pub fn run(config: &ReportConfig) -> Result<ReportOutcome> {
    let inputs = ReportInputs::load(&config.input_dir)?;
    let headline = Headline::from_inputs(&inputs);

    let doc = document::build(&inputs, &headline, &config.title, config.timestamp());
    let workbook_bytes = workbook::render(&inputs)?;
    let document_bytes = doc.to_docx()?;

    let out = &config.output_dir;
    std::fs::create_dir_all(out).map_err(|e| QualityError::from_io(out, e))?;
    let workbook_path = config.workbook_path();
    let document_path = config.document_path();

    // Both files land in the output directory before either is renamed into place.
    let staged_workbook = stage(out, &workbook_bytes)?;
    let staged_document = stage(out, &document_bytes)?;
    staged_workbook
        .persist(&workbook_path)
        .map_err(|e| QualityError::from_io(&workbook_path, e.error))?;
    if let Err(e) = staged_document.persist(&document_path) {
        if let Err(rm) = std::fs::remove_file(&workbook_path) {
            tracing::warn!(path = %workbook_path.display(), error = %rm, "could not remove workbook");
        }
        return Err(QualityError::from_io(&document_path, e.error));
    }

    tracing::info!(
        workbook = %workbook_path.display(),
        document = %document_path.display(),
        tests = headline.tests_total,
        lint_issues = headline.lint_issues,
        "report complete"
    );
    Ok(ReportOutcome {
        workbook: workbook_path,
        document: document_path,
        headline,
    })
}
