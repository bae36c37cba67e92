// book-stats: prints purchase statistics for a CSV or spreadsheet export as JSON
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use engine::{EngineSettings, ReportService};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "book-stats", version)]
#[command(about = "Purchase statistics (totals, places, months) from a book-collection export")]
struct Args {
    /// CSV or spreadsheet file; only the first sheet is read
    input: PathBuf,

    /// JSON settings file overriding the bundled defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep only the first N places in each breakdown (0 keeps all)
    #[arg(long)]
    top: Option<usize>,

    /// Print the summary on a single line
    #[arg(long, default_value = "false")]
    compact: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => EngineSettings::load_from_file(path)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        None => EngineSettings::load_default()?,
    };
    let top = args.top.unwrap_or(settings.top_places);

    info!("Starting book-stats...");
    let service = ReportService::with_settings(settings);
    let dataset = service
        .load_file(&args.input)
        .with_context(|| format!("could not read '{}'", args.input.display()))?;

    let view = dataset.summary.with_top_places(top);
    let json = if args.compact {
        serde_json::to_string(&view)?
    } else {
        serde_json::to_string_pretty(&view)?
    };
    println!("{}", json);
    Ok(())
}
