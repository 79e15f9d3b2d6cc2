//! Covermatch CLI
//!
//! A command-line tool that resolves noisy movie/series cover titles
//! against TMDB and enriches matches with OMDb ratings.

use clap::Parser;
use covermatch::cli::{
    args::{Cli, Commands},
    commands::{batch, rating, resolve},
};
use covermatch::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run preflight checks unless skipped
    if !cli.skip_preflight {
        run_preflight_checks().await?;
    }

    // Run the appropriate command
    match cli.command {
        Commands::Resolve {
            title,
            language,
            year,
            format,
        } => {
            resolve::execute_resolve(title, language, year, format).await?;
        }

        Commands::Batch {
            file,
            language,
            format,
        } => {
            batch::execute_batch(&file, language, format).await?;
        }

        Commands::Rating { imdb_id } => {
            rating::execute_rating(imdb_id).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("covermatch=debug")
    } else {
        EnvFilter::new("covermatch=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks() -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks().await?;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
