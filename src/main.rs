use std::path::PathBuf;

use a11y_merge::io::discover::{COMBINED_WORKBOOK_NAME, FLAT_VIOLATIONS_NAME};
use a11y_merge::merge;
use a11y_merge::{Result, ToolError};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

// Early exits ("no input", "no data") are reported by the library and still
// finish successfully.
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Combine(args) => {
            merge::combine(&args.results_dir, COMBINED_WORKBOOK_NAME)?;
        }
        Command::Extract(args) => {
            merge::extract(&args.results_dir, FLAT_VIOLATIONS_NAME)?;
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge per-page accessibility audit reports into combined outputs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Combine every report into one workbook with a sheet per page.
    Combine(ResultsArgs),
    /// Collect all violations except nested interactive ones into one CSV file.
    Extract(ResultsArgs),
}

#[derive(clap::Args)]
struct ResultsArgs {
    /// Directory holding the per-page CSV reports.
    #[arg(default_value = "results")]
    results_dir: PathBuf,
}
