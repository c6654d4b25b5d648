use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a single test case, classified from its child elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Ok,
    Failure,
    Error,
    Skipped,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Ok => "ok",
            TestStatus::Failure => "failure",
            TestStatus::Error => "error",
            TestStatus::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub classname: String,
    pub name: String,
    pub status: TestStatus,
    pub time_sec: f64,
}

/// Counts summed over every suite in a JUnit document, plus the cases in document order.
///
/// Counts come from the suite attributes, not from the cases, so they may
/// disagree with `cases.len()` on hand-edited input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    pub total: i64,
    pub failures: i64,
    pub errors: i64,
    pub skipped: i64,
    pub time_sec: f64,
    pub cases: Vec<TestCase>,
}

impl TestRun {
    /// `total - failures - errors - skipped`. Negative on inconsistent input.
    pub fn passed(&self) -> i64 {
        self.total - self.failures - self.errors - self.skipped
    }

    /// Failures and errors together.
    pub fn failed(&self) -> i64 {
        self.failures + self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub filename: String,
    pub line_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Overall line-rate from the document root. Not range-checked.
    pub line_rate: f64,
    /// One entry per `class` element; repeated filenames are kept.
    pub files: Vec<FileCoverage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintDiagnostic {
    pub filename: String,
    pub line: u64,
    pub col: u64,
    pub code: String,
    pub message: String,
}

/// One row of the rule-frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCount {
    pub rank: usize,
    pub rule: String,
    pub count: usize,
}

/// Most frequent rule codes, ties kept in first-seen order.
pub fn top_rules(diagnostics: &[LintDiagnostic], limit: usize) -> Vec<RuleCount> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for d in diagnostics {
        match slots.get(d.code.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slots.insert(d.code.as_str(), counts.len());
                counts.push((d.code.as_str(), 1));
            }
        }
    }
    // stable: equal counts keep insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (rule, count))| RuleCount {
            rank: i + 1,
            rule: rule.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(code: &str) -> LintDiagnostic {
        LintDiagnostic {
            filename: "a.py".into(),
            line: 1,
            col: 1,
            code: code.into(),
            message: String::new(),
        }
    }

    #[test]
    fn top_rules_counts_and_ranks() {
        let diags: Vec<_> = ["E1", "E2", "E1", "E1", "E3"].iter().map(|c| diag(c)).collect();
        let top = top_rules(&diags, 5);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], RuleCount { rank: 1, rule: "E1".into(), count: 3 });
        assert_eq!(top[1].rule, "E2");
        assert_eq!(top[1].count, 1);
        assert_eq!(top[2].rule, "E3");
        assert_eq!(top[2].rank, 3);
    }

    #[test]
    fn top_rules_many_distinct_codes() {
        let diags: Vec<_> = (0..2000).map(|i| diag(&format!("R{}", i % 400))).collect();
        let top = top_rules(&diags, 5);
        let rules: Vec<_> = top.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(rules, ["R0", "R1", "R2", "R3", "R4"]);
        assert!(top.iter().all(|r| r.count == 5));
    }

    #[test]
    fn top_rules_truncates_to_limit() {
        let diags: Vec<_> = ["A", "B", "C", "D", "E", "F", "F"].iter().map(|c| diag(c)).collect();
        let top = top_rules(&diags, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].rule, "F");
        let rest: Vec<_> = top[1..].iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(rest, ["A", "B", "C", "D"]);
    }

    #[test]
    fn top_rules_empty() {
        assert!(top_rules(&[], 5).is_empty());
    }

    #[test]
    fn passed_may_go_negative() {
        let run = TestRun {
            total: 2,
            failures: 2,
            errors: 1,
            skipped: 0,
            ..TestRun::default()
        };
        assert_eq!(run.passed(), -1);
        assert_eq!(run.failed(), 3);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TestStatus::Skipped).unwrap(), "\"skipped\"");
        assert_eq!(TestStatus::Failure.to_string(), "failure");
    }
}
