pub mod extract;
pub mod report;
pub mod run;

use super::args::*;
use crate::exit_codes::SUCCESS;
use anyhow::Context;
use qreport_core::{ReportConfig, Settings};
use std::path::Path;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Extract(args) => extract::run(args),
        Command::Report(args) => report::run(args),
        Command::Run(args) => run::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Settings from `--config`, or built-in defaults when no file was given.
fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(p) => {
            let settings = Settings::load(p)
                .with_context(|| format!("failed to load settings from {}", p.display()))?;
            tracing::debug!(path = %p.display(), "loaded settings");
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

/// Flags over file values over defaults.
fn report_config(
    settings: &Settings,
    input_dir: Option<&Path>,
    render: &RenderArgs,
) -> ReportConfig {
    let mut config = settings.report_config();
    if let Some(dir) = input_dir {
        config.input_dir = dir.to_path_buf();
    }
    if let Some(dir) = &render.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(title) = &render.title {
        config.title = title.clone();
    }
    config
}
