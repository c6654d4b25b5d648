//! The five CSV tables exchanged between the extract and report stages.

use crate::error::{QualityError, Result};
use std::path::Path;

/// Which of the fixed-schema tables a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Summary,
    Tests,
    CoverageFiles,
    Lint,
    LintTop5,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Summary,
        TableKind::Tests,
        TableKind::CoverageFiles,
        TableKind::Lint,
        TableKind::LintTop5,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::Summary => "summary.csv",
            TableKind::Tests => "tests.csv",
            TableKind::CoverageFiles => "coverage_files.csv",
            TableKind::Lint => "lint.csv",
            TableKind::LintTop5 => "lint_top5.csv",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            TableKind::Summary => &["metric", "value"],
            TableKind::Tests => &["classname", "name", "status", "time_sec"],
            TableKind::CoverageFiles => &["filename", "coverage_percent"],
            TableKind::Lint => &["filename", "line", "col", "code", "message"],
            TableKind::LintTop5 => &["rank", "rule", "count"],
        }
    }

    /// Worksheet name in the summary workbook.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            TableKind::Summary => "Summary",
            TableKind::Tests => "Tests",
            TableKind::CoverageFiles => "Coverage",
            TableKind::Lint => "Lint",
            TableKind::LintTop5 => "LintTop5",
        }
    }

    /// An empty table carrying this kind's header row.
    pub fn empty_table(&self) -> Table {
        Table::new(self.headers().iter().map(|h| h.to_string()).collect())
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".csv"))
    }
}

/// Header plus string cells. Rows are padded or cut to the header width on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, top to bottom. Empty when the column is absent.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |r| idx.map(|i| r.get(i).map(String::as_str).unwrap_or("")))
    }

    /// Same headers, rows for which `keep` returns true.
    pub fn filter_rows(&self, mut keep: impl FnMut(&[String]) -> bool) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Write a table as UTF-8 CSV. The header row is written even with no rows.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let csv_err = |source| QualityError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(&table.headers).map_err(csv_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| QualityError::from_io(path, e))?;
    Ok(())
}

/// Read a CSV written by [`write_csv`] (or by hand). A zero-byte file is an empty table.
pub fn read_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|e| QualityError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_read_error(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let width = headers.len();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(|e| csv_read_error(path, e))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        table.rows.push(row);
    }
    Ok(table)
}

fn csv_read_error(path: &Path, e: csv::Error) -> QualityError {
    if e.is_io_error() {
        QualityError::Csv {
            path: path.to_path_buf(),
            source: e,
        }
    } else {
        QualityError::malformed(path, e.to_string())
    }
}
