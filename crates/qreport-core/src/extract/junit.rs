use crate::error::Result;
use crate::model::{TestCase, TestRun, TestStatus};
use crate::numeric::{coerce_f64, coerce_int};
use crate::xml::{self, Element};
use std::path::Path;

/// Read a JUnit report with either a `testsuite` or a `testsuites` root.
pub fn read_junit(path: &Path) -> Result<TestRun> {
    let root = xml::parse_file(path)?;
    let run = test_run_from_root(&root);
    tracing::debug!(
        path = %path.display(),
        suites = suites(&root).len(),
        cases = run.cases.len(),
        "parsed junit report"
    );
    Ok(run)
}

fn suites(root: &Element) -> Vec<&Element> {
    if root.name == "testsuite" {
        vec![root]
    } else {
        root.children_named("testsuite").collect()
    }
}

pub(crate) fn test_run_from_root(root: &Element) -> TestRun {
    let mut run = TestRun::default();
    for suite in suites(root) {
        run.total += int_attr(suite, "tests");
        run.failures += int_attr(suite, "failures");
        run.errors += int_attr(suite, "errors");
        run.skipped += int_attr(suite, "skipped");
        run.time_sec += float_attr(suite, "time");

        run.cases
            .extend(suite.children_named("testcase").map(test_case));
    }
    if run.passed() < 0 {
        tracing::warn!(
            total = run.total,
            failures = run.failures,
            errors = run.errors,
            skipped = run.skipped,
            "suite counts exceed total; passed count is negative"
        );
    }
    run
}

fn test_case(tc: &Element) -> TestCase {
    TestCase {
        classname: tc.attr("classname").unwrap_or_default().to_string(),
        name: tc.attr("name").unwrap_or_default().to_string(),
        status: classify(tc),
        time_sec: float_attr(tc, "time"),
    }
}

/// `failure` beats `error` beats `skipped`.
fn classify(tc: &Element) -> TestStatus {
    if tc.has_child("failure") {
        TestStatus::Failure
    } else if tc.has_child("error") {
        TestStatus::Error
    } else if tc.has_child("skipped") {
        TestStatus::Skipped
    } else {
        TestStatus::Ok
    }
}

fn int_attr(el: &Element, key: &str) -> i64 {
    el.attr(key).map(coerce_int).unwrap_or(0)
}

fn float_attr(el: &Element, key: &str) -> f64 {
    el.attr(key).map(coerce_f64).unwrap_or(0.0)
}
