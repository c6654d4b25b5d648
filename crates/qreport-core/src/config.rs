//! Stage configuration and the optional YAML settings file.

use crate::error::{read_to_string, QualityError, Result};
use crate::table::TableKind;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CSV_DIR: &str = "out_csv";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_WORKBOOK_NAME: &str = "quality_summary.xlsx";
pub const DEFAULT_DOCUMENT_NAME: &str = "quality_report.docx";
pub const DEFAULT_TITLE: &str = "Software Quality Report";

/// Inputs and output directory of the extraction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    pub junit: PathBuf,
    pub coverage: PathBuf,
    pub lint: PathBuf,
    pub out_dir: PathBuf,
}

impl ExtractConfig {
    pub fn new(
        junit: impl Into<PathBuf>,
        coverage: impl Into<PathBuf>,
        lint: impl Into<PathBuf>,
    ) -> Self {
        Self {
            junit: junit.into(),
            coverage: coverage.into(),
            lint: lint.into(),
            out_dir: PathBuf::from(DEFAULT_CSV_DIR),
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }
}

/// Where the reporting stage reads tables from and writes artifacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub workbook_name: String,
    pub document_name: String,
    pub title: String,
    /// Timestamp printed in the document header; `None` means now.
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_CSV_DIR),
            output_dir: PathBuf::from(DEFAULT_OUT_DIR),
            workbook_name: DEFAULT_WORKBOOK_NAME.to_string(),
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
            generated_at: None,
        }
    }
}

impl ReportConfig {
    pub fn with_dirs(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn table_path(&self, kind: TableKind) -> PathBuf {
        self.input_dir.join(kind.file_name())
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.output_dir.join(&self.workbook_name)
    }

    pub fn document_path(&self) -> PathBuf {
        self.output_dir.join(&self.document_name)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.generated_at
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

/// Optional `qreport.yaml`. Every key may be omitted.
///
/// ```yaml
/// csv_dir: build/quality_csv
/// out_dir: build/quality
/// title: Nightly Quality Report
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub csv_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub workbook_name: Option<String>,
    pub document_name: Option<String>,
    pub title: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|e| QualityError::malformed(path, e.to_string()))
    }

    pub fn csv_dir(&self) -> PathBuf {
        self.csv_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_DIR))
    }

    /// Report configuration with file values layered over the defaults.
    pub fn report_config(&self) -> ReportConfig {
        let d = ReportConfig::default();
        ReportConfig {
            input_dir: self.csv_dir(),
            output_dir: self.out_dir.clone().unwrap_or(d.output_dir),
            workbook_name: self.workbook_name.clone().unwrap_or(d.workbook_name),
            document_name: self.document_name.clone().unwrap_or(d.document_name),
            title: self.title.clone().unwrap_or(d.title),
            generated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_match_fixed_layout() {
        let c = ReportConfig::default();
        assert_eq!(c.table_path(TableKind::Tests), Path::new("out_csv/tests.csv"));
        assert_eq!(c.workbook_path(), Path::new("out/quality_summary.xlsx"));
        assert_eq!(c.document_path(), Path::new("out/quality_report.docx"));
    }

    #[test]
    fn extract_default_out_dir() {
        let c = ExtractConfig::new("j.xml", "c.xml", "r.json");
        assert_eq!(c.out_dir, Path::new("out_csv"));
        assert_eq!(c.with_out_dir("x").out_dir, Path::new("x"));
    }

    #[test]
    fn settings_layer_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("qreport.yaml");
        std::fs::write(&p, "csv_dir: tables\ntitle: Nightly\n").unwrap();
        let s = Settings::load(&p).unwrap();
        let c = s.report_config();
        assert_eq!(c.input_dir, Path::new("tables"));
        assert_eq!(c.output_dir, Path::new("out"));
        assert_eq!(c.title, "Nightly");
        assert_eq!(c.workbook_name, DEFAULT_WORKBOOK_NAME);
    }

    #[test]
    fn settings_reject_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("qreport.yaml");
        std::fs::write(&p, "csv_dri: typo\n").unwrap();
        let err = Settings::load(&p).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedInput);
    }

    #[test]
    fn missing_settings_file_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(&dir.path().join("nope.yaml"))
            .unwrap_err()
            .is_missing_input());
    }

    #[test]
    fn fixed_timestamp_is_used() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let c = ReportConfig {
            generated_at: Some(ts),
            ..ReportConfig::default()
        };
        assert_eq!(c.timestamp(), ts);
    }
}
