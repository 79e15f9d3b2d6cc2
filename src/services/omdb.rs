//! OMDb API client (rating provider).

use crate::models::candidate::RatingRecord;
use crate::services::RatingSource;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;

const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Provider tag stamped on rating records.
const PROVIDER: &str = "omdb";

/// OMDb client configuration.
#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub api_key: String,
}

impl OmdbConfig {
    /// Create config from environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("OMDB_API_KEY").map_err(|_| crate::Error::OmdbApiKeyMissing)?;
        Self::with_key(api_key)
    }

    /// Create config from an explicit key.
    pub fn with_key(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(crate::Error::OmdbApiKeyMissing);
        }
        Ok(Self { api_key })
    }
}

/// OMDb API client.
pub struct OmdbClient {
    config: OmdbConfig,
    client: reqwest::Client,
}

/// Lookup response payload.
///
/// OMDb reports "not found" as a 200 with `Response: "False"`, and absent
/// numeric fields as the literal string "N/A".
#[derive(Debug, Deserialize)]
struct OmdbLookupResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Parse the provider's rating string, treating the "N/A" sentinel and
/// non-finite values as absent.
fn parse_rating(raw: Option<&str>) -> Option<f32> {
    let raw = raw?.trim();
    if raw.eq_ignore_ascii_case("n/a") {
        return None;
    }
    raw.parse::<f32>().ok().filter(|r| r.is_finite())
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Create a new OMDb client from environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(OmdbConfig::from_env()?))
    }

    /// Look up the rating record for an IMDB id.
    ///
    /// A provider-level "not found" is `Ok(None)`; only transport failures
    /// surface as errors.
    pub async fn lookup_rating(&self, imdb_id: &str) -> Result<Option<RatingRecord>> {
        let url = format!(
            "{}?i={}&apikey={}",
            OMDB_BASE_URL,
            urlencoding::encode(imdb_id),
            self.config.api_key
        );

        let resp: OmdbLookupResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !resp.response.eq_ignore_ascii_case("true") {
            tracing::debug!(
                "OMDb has no data for {}: {}",
                imdb_id,
                resp.error.as_deref().unwrap_or("no error message")
            );
            return Ok(None);
        }

        Ok(Some(RatingRecord {
            external_id: imdb_id.to_string(),
            rating: parse_rating(resp.imdb_rating.as_deref()),
            votes: resp
                .imdb_votes
                .filter(|v| !v.trim().eq_ignore_ascii_case("n/a")),
            provider: PROVIDER.to_string(),
        }))
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = format!("{}?i=tt0111161&apikey={}", OMDB_BASE_URL, self.config.api_key);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl RatingSource for OmdbClient {
    async fn lookup(&self, external_id: &str) -> Result<Option<RatingRecord>> {
        self.lookup_rating(external_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating_na_sentinel() {
        assert_eq!(parse_rating(Some("N/A")), None);
        assert_eq!(parse_rating(Some("n/a")), None);
        assert_eq!(parse_rating(None), None);
    }

    #[test]
    fn test_parse_rating_number() {
        assert_eq!(parse_rating(Some("8.8")), Some(8.8));
        assert_eq!(parse_rating(Some("not a number")), None);
        assert_eq!(parse_rating(Some("NaN")), None);
    }
}
