//! Turn CI quality artifacts into CSV tables, a summary workbook and a report.
//!
//! Two stages that only talk through files:
//!
//! 1. [`extract`] parses a JUnit XML report, a Cobertura coverage report and a
//!    lint diagnostics JSON file, and writes five CSV tables.
//! 2. [`report`] reads those tables back and renders `quality_summary.xlsx`
//!    and `quality_report.docx`.

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod numeric;
pub mod report;
pub mod summary;
pub mod table;
pub mod xml;

// Convenience re-exports
pub use config::{ExtractConfig, ReportConfig, Settings};
pub use error::{ErrorKind, QualityError, Result};
pub use extract::{ExtractOutcome, Extraction};
pub use model::{
    CoverageReport, FileCoverage, LintDiagnostic, RuleCount, TestCase, TestRun, TestStatus,
};
pub use report::{Headline, ReportInputs, ReportOutcome};
pub use summary::{MetricValue, SummaryMetrics};
pub use table::{Table, TableKind};
