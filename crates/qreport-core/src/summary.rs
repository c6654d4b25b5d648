//! Top-line metrics written to `summary.csv` and read back by the reporter.

use crate::model::{CoverageReport, LintDiagnostic, TestRun};
use crate::numeric::{coerce_f64, format_float, round_to};
use crate::table::{Table, TableKind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub mod metric {
    pub const TESTS_TOTAL: &str = "tests_total";
    pub const TESTS_PASSED: &str = "tests_passed";
    pub const TESTS_FAILED: &str = "tests_failed";
    pub const TESTS_SKIPPED: &str = "tests_skipped";
    pub const TESTS_TIME_SEC: &str = "tests_time_sec";
    pub const COVERAGE_PERCENT: &str = "coverage_percent";
    pub const LINT_ISSUES: &str = "lint_issues";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Parse a CSV cell: integer, then float, then raw text.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if let Ok(n) = s.parse::<i64>() {
            MetricValue::Int(n)
        } else if let Some(f) = crate::numeric::parse_number(s) {
            MetricValue::Float(f)
        } else {
            MetricValue::Text(raw.to_string())
        }
    }

    /// Numeric view; text coerces (zero when it is not a number).
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Int(n) => *n as f64,
            MetricValue::Float(f) => *f,
            MetricValue::Text(s) => coerce_f64(s),
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Int(n) => write!(f, "{n}"),
            MetricValue::Float(v) => f.write_str(&format_float(*v)),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered metric name to value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryMetrics {
    entries: Vec<(String, MetricValue)>,
}

impl SummaryMetrics {
    pub fn compute(run: &TestRun, coverage: &CoverageReport, lint: &[LintDiagnostic]) -> Self {
        let mut m = SummaryMetrics::default();
        m.insert(metric::TESTS_TOTAL, MetricValue::Int(run.total));
        m.insert(metric::TESTS_PASSED, MetricValue::Int(run.passed()));
        m.insert(metric::TESTS_FAILED, MetricValue::Int(run.failed()));
        m.insert(metric::TESTS_SKIPPED, MetricValue::Int(run.skipped));
        m.insert(
            metric::TESTS_TIME_SEC,
            MetricValue::Float(round_to(run.time_sec, 3)),
        );
        m.insert(
            metric::COVERAGE_PERCENT,
            MetricValue::Float(round_to(coverage.line_rate * 100.0, 2)),
        );
        m.insert(metric::LINT_ISSUES, MetricValue::Int(lint.len() as i64));
        m
    }

    /// Read `metric`/`value` rows. Tables without both columns give no metrics.
    pub fn from_table(table: &Table) -> Self {
        let (Some(mi), Some(vi)) = (table.column_index("metric"), table.column_index("value"))
        else {
            return Self::default();
        };
        let mut m = SummaryMetrics::default();
        for row in &table.rows {
            m.insert(row[mi].clone(), MetricValue::parse(&row[vi]));
        }
        m
    }

    /// Insert or replace, keeping the first position of the name.
    pub fn insert(&mut self, name: impl Into<String>, value: MetricValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_table(&self) -> Table {
        let mut t = TableKind::Summary.empty_table();
        for (k, v) in self.iter() {
            t.push_row([k.to_string(), v.to_string()]);
        }
        t
    }
}

impl Serialize for SummaryMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
