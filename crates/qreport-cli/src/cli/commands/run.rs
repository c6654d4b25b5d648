use super::super::args::RunArgs;
use crate::exit_codes::SUCCESS;

/// Both stages back to back. The report stage re-reads the tables from disk.
pub fn run(args: RunArgs) -> anyhow::Result<i32> {
    let settings = super::load_settings(args.render.config.as_deref())?;
    let csv_dir = args.csv_dir.unwrap_or_else(|| settings.csv_dir());

    let extracted = super::extract::extract(&args.sources, csv_dir)?;
    println!("CSV written to {}", extracted.out_dir.display());

    let config = super::report_config(&settings, Some(&extracted.out_dir), &args.render);
    let outcome = super::report::render(&config)?;
    super::report::print_outcome(&outcome);
    Ok(SUCCESS)
}
