//! Extraction stage: CI tool outputs to normalized CSV tables.

pub mod coverage;
pub mod junit;
pub mod lint;

pub use coverage::read_coverage;
pub use junit::read_junit;
pub use lint::read_lint;

use crate::config::ExtractConfig;
use crate::error::{QualityError, Result};
use crate::model::{top_rules, CoverageReport, LintDiagnostic, TestRun};
use crate::numeric::{format_float, round_to};
use crate::summary::SummaryMetrics;
use crate::table::{write_csv, Table, TableKind};
use std::path::PathBuf;

/// Number of rule codes kept in `lint_top5`.
pub const TOP_RULES: usize = 5;

/// Everything parsed from the three inputs of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub tests: TestRun,
    pub coverage: CoverageReport,
    pub lint: Vec<LintDiagnostic>,
}

/// Result of a completed extraction.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub out_dir: PathBuf,
    pub summary: SummaryMetrics,
    pub files: Vec<PathBuf>,
}

impl Extraction {
    /// Parse all three inputs. Any failure aborts before anything is written.
    pub fn load(config: &ExtractConfig) -> Result<Self> {
        Ok(Self {
            tests: read_junit(&config.junit)?,
            coverage: read_coverage(&config.coverage)?,
            lint: read_lint(&config.lint)?,
        })
    }

    pub fn summary(&self) -> SummaryMetrics {
        SummaryMetrics::compute(&self.tests, &self.coverage, &self.lint)
    }

    pub fn table(&self, kind: TableKind) -> Table {
        let mut t = kind.empty_table();
        match kind {
            TableKind::Summary => return self.summary().to_table(),
            TableKind::Tests => {
                for c in &self.tests.cases {
                    t.push_row([
                        c.classname.clone(),
                        c.name.clone(),
                        c.status.to_string(),
                        format_float(round_to(c.time_sec, 4)),
                    ]);
                }
            }
            TableKind::CoverageFiles => {
                for f in &self.coverage.files {
                    t.push_row([
                        f.filename.clone(),
                        format_float(round_to(f.line_rate * 100.0, 2)),
                    ]);
                }
            }
            TableKind::Lint => {
                for d in &self.lint {
                    t.push_row([
                        d.filename.clone(),
                        d.line.to_string(),
                        d.col.to_string(),
                        d.code.clone(),
                        d.message.clone(),
                    ]);
                }
            }
            TableKind::LintTop5 => {
                for r in top_rules(&self.lint, TOP_RULES) {
                    t.push_row([r.rank.to_string(), r.rule, r.count.to_string()]);
                }
            }
        }
        t
    }

    /// Write the five tables into `out_dir`, creating it if needed.
    pub fn write_tables(&self, out_dir: &std::path::Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(out_dir).map_err(|e| QualityError::from_io(out_dir, e))?;
        let mut written = Vec::with_capacity(TableKind::ALL.len());
        for kind in TableKind::ALL {
            let path = out_dir.join(kind.file_name());
            let table = self.table(kind);
            write_csv(&path, &table)?;
            tracing::debug!(table = %kind, rows = table.len(), path = %path.display(), "wrote table");
            written.push(path);
        }
        Ok(written)
    }
}

/// Run the extraction stage end to end.
pub fn run(config: &ExtractConfig) -> Result<ExtractOutcome> {
    let extraction = Extraction::load(config)?;
    let files = extraction.write_tables(&config.out_dir)?;
    let out_dir = std::fs::canonicalize(&config.out_dir).unwrap_or_else(|_| config.out_dir.clone());
    tracing::info!(
        out_dir = %out_dir.display(),
        tests = extraction.tests.cases.len(),
        coverage_files = extraction.coverage.files.len(),
        lint_issues = extraction.lint.len(),
        "extraction complete"
    );
    Ok(ExtractOutcome {
        out_dir,
        summary: extraction.summary(),
        files,
    })
}
