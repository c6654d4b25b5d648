//! Lint diagnostics JSON (ruff and tools with a similar output shape).
//!
//! Two document shapes are accepted: a bare array of diagnostics, or an object
//! with a `diagnostics` array. Each diagnostic locates itself either with a
//! `location` object (`row`/`line`, `column`/`col`) or an LSP-style
//! `range.start` (`line`, `character`).

use crate::error::{read_to_string, QualityError, Result};
use crate::model::LintDiagnostic;
use crate::numeric::coerce_int;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

pub const DEFAULT_RULE_CODE: &str = "NA";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LintDocument {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default)]
        diagnostics: Vec<Value>,
    },
}

impl LintDocument {
    fn into_items(self) -> Vec<Value> {
        match self {
            LintDocument::Bare(items) | LintDocument::Wrapped { diagnostics: items } => items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDiagnostic {
    filename: Option<Value>,
    path: Option<Value>,
    code: Option<Value>,
    rule: Option<Value>,
    message: Option<Value>,
    diagnostic: Option<Value>,
    location: Option<Value>,
    range: Option<Value>,
}

/// Where a diagnostic points, decoded from whichever shape the tool emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Location { line: u64, col: u64 },
    RangeStart { line: u64, col: u64 },
    Unknown,
}

impl Position {
    fn decode(raw: &RawDiagnostic) -> Self {
        if let Some(Value::Object(loc)) = &raw.location {
            return Position::Location {
                line: index(first_truthy(loc, &["row", "line"])),
                col: index(first_truthy(loc, &["column", "col"])),
            };
        }
        if let Some(Value::Object(range)) = &raw.range {
            let start = range.get("start").and_then(Value::as_object);
            return Position::RangeStart {
                line: index(start.and_then(|s| s.get("line"))),
                col: index(start.and_then(|s| s.get("character"))),
            };
        }
        Position::Unknown
    }

    fn line_col(self) -> (u64, u64) {
        match self {
            Position::Location { line, col } | Position::RangeStart { line, col } => (line, col),
            Position::Unknown => (0, 0),
        }
    }
}

impl RawDiagnostic {
    fn into_diagnostic(self) -> LintDiagnostic {
        let (line, col) = Position::decode(&self).line_col();
        let filename = text(self.filename.as_ref())
            .or_else(|| text(self.path.as_ref()))
            .unwrap_or_default();
        let code = text(self.code.as_ref())
            .or_else(|| text(nested(self.rule.as_ref(), "code")))
            .unwrap_or_else(|| DEFAULT_RULE_CODE.to_string());
        let message = text(self.message.as_ref())
            .or_else(|| text(nested(self.diagnostic.as_ref(), "message")))
            .unwrap_or_default();
        LintDiagnostic {
            filename,
            line,
            col,
            code,
            message,
        }
    }
}

/// Read lint diagnostics. A missing or empty file yields no diagnostics.
pub fn read_lint(path: &Path) -> Result<Vec<LintDiagnostic>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "lint report absent; treating as empty");
        return Ok(Vec::new());
    }
    let body = read_to_string(path)?;
    let diagnostics = parse_lint_str(&body).map_err(|reason| QualityError::malformed(path, reason))?;
    tracing::debug!(path = %path.display(), diagnostics = diagnostics.len(), "parsed lint report");
    Ok(diagnostics)
}

pub fn parse_lint_str(body: &str) -> std::result::Result<Vec<LintDiagnostic>, String> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: LintDocument = serde_json::from_str(body).map_err(|e| {
        if e.is_data() {
            "expected a JSON array of diagnostics or an object with a `diagnostics` array"
                .to_string()
        } else {
            format!("invalid JSON: {e}")
        }
    })?;

    let mut out = Vec::new();
    for (idx, item) in doc.into_items().into_iter().enumerate() {
        if !item.is_object() {
            tracing::warn!(index = idx, "skipping non-object lint diagnostic");
            continue;
        }
        match serde_json::from_value::<RawDiagnostic>(item) {
            Ok(raw) => out.push(raw.into_diagnostic()),
            Err(e) => tracing::warn!(index = idx, error = %e, "skipping unreadable lint diagnostic"),
        }
    }
    Ok(out)
}

fn nested<'a>(parent: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    parent.and_then(Value::as_object).and_then(|o| o.get(key))
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn first_truthy<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| is_truthy(v))
}

/// Non-empty scalar as text. Containers and blanks count as absent.
fn text(v: Option<&Value>) -> Option<String> {
    match v.filter(|v| is_truthy(v))? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Line/column coercion: integers pass through, floats truncate,
/// numeric strings parse, negatives and everything else become 0.
fn index(v: Option<&Value>) -> u64 {
    let n = match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => coerce_int(s),
        Some(Value::Bool(true)) => 1,
        _ => 0,
    };
    u64::try_from(n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruff_array_shape() {
        let diags = parse_lint_str(
            r#"[
              {"code": "F401", "filename": "app.py", "message": "`os` imported but unused",
               "location": {"row": 1, "column": 8}, "end_location": {"row": 1, "column": 10}},
              {"code": "E501", "filename": "app.py", "message": "Line too long",
               "location": {"row": 12, "column": 89}}
            ]"#,
        )
        .unwrap();
        assert_eq!(diags.len(), 2);
        assert_eq!(
            diags[0],
            LintDiagnostic {
                filename: "app.py".into(),
                line: 1,
                col: 8,
                code: "F401".into(),
                message: "`os` imported but unused".into(),
            }
        );
        assert_eq!((diags[1].line, diags[1].col), (12, 89));
    }

    #[test]
    fn wrapped_shape_with_range_and_nested_fields() {
        let diags = parse_lint_str(
            r#"{"diagnostics": [
              {"path": "lib.py", "rule": {"code": "W291"},
               "diagnostic": {"message": "trailing whitespace"},
               "range": {"start": {"line": 4, "character": 2}, "end": {"line": 4, "character": 9}}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            diags,
            vec![LintDiagnostic {
                filename: "lib.py".into(),
                line: 4,
                col: 2,
                code: "W291".into(),
                message: "trailing whitespace".into(),
            }]
        );
    }

    #[test]
    fn location_wins_over_range() {
        let diags = parse_lint_str(
            r#"[{"location": {"line": 3, "col": 5}, "range": {"start": {"line": 9, "character": 9}}}]"#,
        )
        .unwrap();
        assert_eq!((diags[0].line, diags[0].col), (3, 5));
    }

    #[test]
    fn row_zero_falls_back_to_line() {
        let diags = parse_lint_str(r#"[{"location": {"row": 0, "line": 7}}]"#).unwrap();
        assert_eq!(diags[0].line, 7);
    }

    #[test]
    fn defaults_when_fields_absent() {
        let diags = parse_lint_str(r#"[{}]"#).unwrap();
        assert_eq!(
            diags[0],
            LintDiagnostic {
                filename: String::new(),
                line: 0,
                col: 0,
                code: "NA".into(),
                message: String::new(),
            }
        );
    }

    #[test]
    fn null_code_uses_placeholder() {
        let diags = parse_lint_str(r#"[{"code": null, "message": "SyntaxError"}]"#).unwrap();
        assert_eq!(diags[0].code, "NA");
    }

    #[test]
    fn numeric_fields_are_coerced() {
        let diags =
            parse_lint_str(r#"[{"location": {"row": "12", "column": 3.9}}, {"location": {"row": -4}}]"#)
                .unwrap();
        assert_eq!((diags[0].line, diags[0].col), (12, 3));
        assert_eq!(diags[1].line, 0);
    }

    #[test]
    fn empty_inputs() {
        assert!(parse_lint_str("").unwrap().is_empty());
        assert!(parse_lint_str("  \n").unwrap().is_empty());
        assert!(parse_lint_str("[]").unwrap().is_empty());
        assert!(parse_lint_str("{}").unwrap().is_empty());
    }

    #[test]
    fn duplicates_are_preserved_in_order() {
        let diags = parse_lint_str(r#"[{"code":"E1"},{"code":"E1"},{"code":"E2"}]"#).unwrap();
        let codes: Vec<_> = diags.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, ["E1", "E1", "E2"]);
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(parse_lint_str("42").is_err());
        assert!(parse_lint_str("{not json").is_err());
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let diags = parse_lint_str(r#"[{"code":"E1"}, "garbage", 3]"#).unwrap();
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn missing_and_empty_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_lint(&dir.path().join("ruff.json")).unwrap().is_empty());
        let p = dir.path().join("empty.json");
        std::fs::write(&p, "").unwrap();
        assert!(read_lint(&p).unwrap().is_empty());
    }
}
