//! CLI command implementations.

pub mod batch;
pub mod rating;
pub mod resolve;

use crate::core::pipeline::ResolutionPipeline;
use crate::models::config::{load_config, Config};
use crate::services::omdb::{OmdbClient, OmdbConfig};
use crate::services::tmdb::{TmdbClient, TmdbConfig};
use anyhow::Result;

/// Build the resolution pipeline from config file and environment.
pub fn build_pipeline(config: &Config) -> Result<ResolutionPipeline<TmdbClient, OmdbClient>> {
    let tmdb = match config.tmdb.api_key.clone() {
        Some(key) => TmdbClient::new(TmdbConfig::with_key(key)?),
        None => TmdbClient::from_env()?,
    };
    let omdb = match config.omdb.api_key.clone() {
        Some(key) => OmdbClient::new(OmdbConfig::with_key(key)?),
        None => OmdbClient::from_env()?,
    };
    Ok(ResolutionPipeline::new(tmdb, omdb, config.resolver.clone()))
}

/// Load the application config.
pub fn app_config() -> Config {
    load_config()
}
