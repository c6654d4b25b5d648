use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qreport",
    version,
    about = "Turn JUnit, Cobertura and lint output into CSV tables, an xlsx summary and a docx report"
)]
pub struct Cli {
    /// Only log warnings and errors (RUST_LOG still wins)
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse CI artifacts into five CSV tables
    Extract(ExtractArgs),
    /// Render the workbook and document from the CSV tables
    Report(ReportArgs),
    /// Extract, then report, in one invocation
    Run(RunArgs),
    Version,
}

/// The three CI artifacts every extraction needs.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// JUnit-style test result XML
    #[arg(long)]
    pub junit: PathBuf,

    /// Cobertura-style coverage XML
    #[arg(long)]
    pub coverage: PathBuf,

    /// Lint diagnostics JSON (ruff format); a missing file counts as no issues
    #[arg(long)]
    pub ruff: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Directory for the CSV tables [default: out_csv]
    #[arg(long, env = "QREPORT_CSV_DIR")]
    pub outdir: Option<PathBuf>,

    /// YAML settings file
    #[arg(long, env = "QREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Overrides shared by `report` and `run`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Directory for the workbook and document [default: out]
    #[arg(long, env = "QREPORT_OUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// YAML settings file
    #[arg(long, env = "QREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    /// Directory holding the five CSV tables [default: out_csv]
    #[arg(long, env = "QREPORT_CSV_DIR")]
    pub input_dir: Option<PathBuf>,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Intermediate CSV directory [default: out_csv]
    #[arg(long, env = "QREPORT_CSV_DIR")]
    pub csv_dir: Option<PathBuf>,

    #[command(flatten)]
    pub render: RenderArgs,
}
