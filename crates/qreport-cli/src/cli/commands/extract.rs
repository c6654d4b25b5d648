use super::super::args::{ExtractArgs, OutputFormat, SourceArgs};
use crate::exit_codes::SUCCESS;
use anyhow::Context;
use qreport_core::{ExtractConfig, ExtractOutcome, SummaryMetrics};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Machine-readable result of `extract --format json`. Metric order follows `summary.csv`.
#[derive(Serialize)]
struct JsonSummary<'a> {
    out_dir: &'a Path,
    summary: &'a SummaryMetrics,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<i32> {
    let settings = super::load_settings(args.config.as_deref())?;
    let out_dir = args.outdir.unwrap_or_else(|| settings.csv_dir());
    let outcome = extract(&args.sources, out_dir)?;

    match args.format {
        OutputFormat::Text => println!("CSV written to {}", outcome.out_dir.display()),
        OutputFormat::Json => println!("{}", json_summary(&outcome)?),
    }
    Ok(SUCCESS)
}

pub(super) fn extract(sources: &SourceArgs, out_dir: PathBuf) -> anyhow::Result<ExtractOutcome> {
    let config = ExtractConfig::new(&sources.junit, &sources.coverage, &sources.ruff)
        .with_out_dir(out_dir);
    qreport_core::extract::run(&config)
        .with_context(|| format!("extraction into {} failed", config.out_dir.display()))
}

fn json_summary(outcome: &ExtractOutcome) -> anyhow::Result<String> {
    let doc = JsonSummary {
        out_dir: &outcome.out_dir,
        summary: &outcome.summary,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qreport_core::MetricValue;

    #[test]
    fn json_keeps_metric_order() {
        let mut summary = SummaryMetrics::default();
        summary.insert("tests_total", MetricValue::Int(4));
        summary.insert("coverage_percent", MetricValue::Float(75.5));
        let outcome = ExtractOutcome {
            out_dir: PathBuf::from("/ci/out_csv"),
            summary,
            files: Vec::new(),
        };
        let text = json_summary(&outcome).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["out_dir"], "/ci/out_csv");
        assert_eq!(v["summary"]["tests_total"], 4);
        assert_eq!(v["summary"]["coverage_percent"], 75.5);
        assert!(text.find("tests_total") < text.find("coverage_percent"));
    }
}
