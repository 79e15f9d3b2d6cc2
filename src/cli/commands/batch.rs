//! Batch command implementation.

use crate::core::cascade::ResolveOptions;
use crate::models::candidate::EnrichedResult;
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Execute batch command: resolve a file of titles, one per line.
pub async fn execute_batch(file: &Path, language: Option<String>, format: String) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let titles: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();

    if titles.is_empty() {
        println!("{} {}", "No titles in".yellow(), file.display());
        return Ok(());
    }

    let config = super::app_config();
    let pipeline = super::build_pipeline(&config)?;
    let options = ResolveOptions {
        language,
        year: None,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Resolving {} titles...", titles.len()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let results = pipeline.resolve_titles_batch(&titles, &options).await;

    spinner.finish_and_clear();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results).unwrap());
        return Ok(());
    }

    print_summary(&titles, &results);
    Ok(())
}

/// Print a summary table keyed by the echoed query string.
fn print_summary(titles: &[String], results: &[EnrichedResult]) {
    println!(
        "{}",
        format!("Resolved {} of {} titles:", results.len(), titles.len())
            .bold()
            .cyan()
    );
    println!();
    println!(
        " {:<30} | {:<30} | {:>4} | {:<10} | {:>6}",
        "Query", "Match", "Year", "Confidence", "Rating"
    );
    println!("{}", "-".repeat(94));

    for result in results {
        println!(
            " {:<30} | {:<30} | {:>4} | {:<10} | {:>6}",
            truncate(&result.query, 30),
            truncate(&result.title, 30),
            result
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string()),
            super::resolve::colored_confidence(result.confidence),
            result
                .rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "-".to_string())
        );
    }

    // Unresolved entries are absent from results; list them by query.
    let resolved: std::collections::HashSet<&str> =
        results.iter().map(|r| r.query.as_str()).collect();
    let missing: Vec<&String> = titles
        .iter()
        .filter(|t| !resolved.contains(t.as_str()))
        .collect();

    if !missing.is_empty() {
        println!();
        println!("{}", "Unresolved:".yellow().bold());
        for title in missing {
            println!("  {}", title);
        }
    }
}

/// Shorten a string for table display.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
