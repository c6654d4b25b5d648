use super::super::args::ReportArgs;
use crate::exit_codes::SUCCESS;
use anyhow::Context;
use qreport_core::{ReportConfig, ReportOutcome};

pub fn run(args: ReportArgs) -> anyhow::Result<i32> {
    let settings = super::load_settings(args.render.config.as_deref())?;
    let config = super::report_config(&settings, args.input_dir.as_deref(), &args.render);
    let outcome = render(&config)?;
    print_outcome(&outcome);
    Ok(SUCCESS)
}

pub(super) fn render(config: &ReportConfig) -> anyhow::Result<ReportOutcome> {
    qreport_core::report::run(config)
        .with_context(|| format!("report from {} failed", config.input_dir.display()))
}

pub(super) fn print_outcome(outcome: &ReportOutcome) {
    println!("Report complete");
    println!("- Workbook: {}", outcome.workbook.display());
    println!("- Document: {}", outcome.document.display());
}
