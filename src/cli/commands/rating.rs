//! Rating command implementation.

use anyhow::Result;
use colored::Colorize;

/// Execute rating command: direct lookup by IMDB id.
pub async fn execute_rating(imdb_id: String) -> Result<()> {
    let config = super::app_config();
    let omdb = match config.omdb.api_key.clone() {
        Some(key) => crate::services::omdb::OmdbClient::new(
            crate::services::omdb::OmdbConfig::with_key(key)?,
        ),
        None => crate::services::omdb::OmdbClient::from_env()?,
    };

    match omdb.lookup_rating(&imdb_id).await? {
        Some(record) => {
            println!("{} {}", "Rating for".bold(), record.external_id.bold());
            println!(
                "  rating: {}",
                record
                    .rating
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("  votes:  {}", record.votes.as_deref().unwrap_or("-"));
        }
        None => {
            println!("{} {}", "No rating data for".yellow(), imdb_id);
        }
    }

    Ok(())
}
