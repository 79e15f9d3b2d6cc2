//! Error types for covermatch.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for covermatch.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("TMDB API key not configured. Set TMDB_API_KEY environment variable")]
    TmdbApiKeyMissing,

    #[error("TMDB API key invalid")]
    TmdbApiKeyInvalid,

    #[error("OMDb API key not configured. Set OMDB_API_KEY environment variable")]
    OmdbApiKeyMissing,

    // Catalog provider errors
    #[error("Catalog search failed: {0}")]
    CatalogSearchError(String),

    #[error("Catalog rate limit exceeded")]
    RateLimited,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
