//! Resolve command implementation.

use crate::core::cascade::ResolveOptions;
use crate::models::candidate::{Confidence, EnrichedResult};
use anyhow::Result;
use colored::Colorize;

/// Execute resolve command.
pub async fn execute_resolve(
    title: String,
    language: Option<String>,
    year: Option<u16>,
    format: String,
) -> Result<()> {
    let config = super::app_config();
    let pipeline = super::build_pipeline(&config)?;
    let options = ResolveOptions { language, year };

    match pipeline.resolve_title(&title, &options).await {
        Some(result) => print_result(&result, &format),
        None => {
            if format == "json" {
                println!("null");
            } else {
                println!("{} {}", "No match:".yellow(), title);
            }
        }
    }

    Ok(())
}

/// Print one enriched result.
pub fn print_result(result: &EnrichedResult, format: &str) {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(result).unwrap());
        return;
    }

    println!(
        "{} {} ({})",
        "Matched:".green().bold(),
        result.title.bold(),
        result
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "????".to_string())
    );
    println!("  kind:       {}", result.kind);
    println!("  catalog id: {}", result.catalog_id);
    println!("  imdb id:    {}", result.external_id.as_deref().unwrap_or("-"));
    println!("  confidence: {}", colored_confidence(result.confidence));
    match result.rating {
        Some(rating) => println!(
            "  rating:     {} ({} votes)",
            rating,
            result.votes.as_deref().unwrap_or("?")
        ),
        None => println!("  rating:     -"),
    }
}

/// Color a confidence tier for terminal output.
pub fn colored_confidence(confidence: Confidence) -> colored::ColoredString {
    match confidence {
        Confidence::High => "high".green(),
        Confidence::Medium => "medium".yellow(),
        Confidence::Low => "low".red(),
    }
}
