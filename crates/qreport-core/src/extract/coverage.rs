use crate::error::Result;
use crate::model::{CoverageReport, FileCoverage};
use crate::numeric::coerce_f64;
use crate::xml::{self, Element};
use std::path::Path;

/// Read a Cobertura-style coverage report.
pub fn read_coverage(path: &Path) -> Result<CoverageReport> {
    let root = xml::parse_file(path)?;
    let report = coverage_from_root(&root);
    tracing::debug!(
        path = %path.display(),
        files = report.files.len(),
        line_rate = report.line_rate,
        "parsed coverage report"
    );
    Ok(report)
}

pub(crate) fn coverage_from_root(root: &Element) -> CoverageReport {
    let line_rate = root.attr("line-rate").map(coerce_f64).unwrap_or(0.0);
    let files = root
        .descendants_named("class")
        .into_iter()
        .filter_map(|cls| {
            let filename = cls.attr("filename").filter(|f| !f.is_empty())?;
            Some(FileCoverage {
                filename: filename.to_string(),
                line_rate: cls.attr("line-rate").map(coerce_f64).unwrap_or(0.0),
            })
        })
        .collect();
    CoverageReport { line_rate, files }
}
