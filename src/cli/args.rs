//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Covermatch - resolve scanned cover titles to catalog entries
#[derive(Parser, Debug)]
#[command(name = "covermatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a single title
    Resolve {
        /// Raw title text (OCR output or typed)
        #[arg(value_name = "TITLE")]
        title: String,

        /// Primary search locale (e.g. de-DE)
        #[arg(short, long)]
        language: Option<String>,

        /// Release year hint
        #[arg(short, long)]
        year: Option<u16>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Resolve a file of titles, one per line
    Batch {
        /// Path to the title list
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Primary search locale (e.g. de-DE)
        #[arg(short, long)]
        language: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Look up the rating for an IMDB id
    Rating {
        /// IMDB id (e.g. tt1160419)
        #[arg(value_name = "IMDB_ID")]
        imdb_id: String,
    },
}
