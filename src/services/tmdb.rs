//! TMDB API client (catalog provider).

use crate::models::candidate::{Candidate, MediaKind};
use crate::services::{CandidateDetail, CatalogSource, SearchKind};
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Fallback delay for the single rate-limit retry when the provider gives
/// no Retry-After hint.
const RATE_LIMIT_RETRY_MS: u64 = 1500;

/// TMDB client configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API key or Bearer token (JWT)
    pub api_key: String,
    /// Whether to use Bearer token authentication (API v4 style)
    pub use_bearer: bool,
}

impl TmdbConfig {
    /// Create config from environment variable.
    /// Supports both API key (v3) and Bearer token (v4) formats.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("TMDB_API_KEY").map_err(|_| crate::Error::TmdbApiKeyMissing)?;
        Self::with_key(api_key)
    }

    /// Create config from an explicit key or token.
    pub fn with_key(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(crate::Error::TmdbApiKeyMissing);
        }

        // Bearer tokens start with "eyJ" (base64 encoded JWT header)
        let use_bearer = api_key.starts_with("eyJ");

        Ok(Self {
            api_key,
            use_bearer,
        })
    }
}

/// TMDB API client.
///
/// Search language is passed per call rather than fixed at construction:
/// the cascade retries the same query under different locales.
pub struct TmdbClient {
    config: TmdbConfig,
    client: reqwest::Client,
}

/// Movie search result page.
#[derive(Debug, Deserialize)]
struct MovieSearchResponse {
    results: Vec<RawMovieHit>,
}

/// Raw movie search hit.
#[derive(Debug, Deserialize)]
struct RawMovieHit {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
    popularity: Option<f64>,
    vote_count: Option<u64>,
}

/// TV search result page.
#[derive(Debug, Deserialize)]
struct TvSearchResponse {
    results: Vec<RawTvHit>,
}

/// Raw TV search hit.
#[derive(Debug, Deserialize)]
struct RawTvHit {
    id: u64,
    name: Option<String>,
    original_name: Option<String>,
    first_air_date: Option<String>,
    popularity: Option<f64>,
    vote_count: Option<u64>,
}

/// Mixed search result page.
#[derive(Debug, Deserialize)]
struct MultiSearchResponse {
    results: Vec<RawMultiHit>,
}

/// Raw mixed search hit. `media_type` decides the shape; hits that are
/// neither movies nor shows (people, collections) are discarded.
#[derive(Debug, Deserialize)]
struct RawMultiHit {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    popularity: Option<f64>,
    vote_count: Option<u64>,
}

/// Movie detail record.
#[derive(Debug, Deserialize)]
struct MovieDetailResponse {
    imdb_id: Option<String>,
    external_ids: Option<RawExternalIds>,
}

/// TV detail record.
#[derive(Debug, Deserialize)]
struct TvDetailResponse {
    external_ids: Option<RawExternalIds>,
}

/// Cross-reference ids attached to a detail record.
#[derive(Debug, Deserialize)]
struct RawExternalIds {
    imdb_id: Option<String>,
}

/// Unify a raw movie hit into a Candidate. The query is the last-resort
/// title fallback so a Candidate's title is never empty.
fn map_movie_hit(hit: RawMovieHit, query: &str) -> Candidate {
    let original = hit.original_title.filter(|t| !t.is_empty());
    let title = hit
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| original.clone())
        .unwrap_or_else(|| query.to_string());

    Candidate {
        id: hit.id,
        kind: MediaKind::Movie,
        title,
        original_title: original,
        release_date: hit.release_date.filter(|d| !d.is_empty()),
        popularity: hit.popularity,
        vote_count: hit.vote_count,
    }
}

/// Unify a raw TV hit into a Candidate.
fn map_tv_hit(hit: RawTvHit, query: &str) -> Candidate {
    let original = hit.original_name.filter(|t| !t.is_empty());
    let title = hit
        .name
        .filter(|t| !t.is_empty())
        .or_else(|| original.clone())
        .unwrap_or_else(|| query.to_string());

    Candidate {
        id: hit.id,
        kind: MediaKind::Series,
        title,
        original_title: original,
        release_date: hit.first_air_date.filter(|d| !d.is_empty()),
        popularity: hit.popularity,
        vote_count: hit.vote_count,
    }
}

/// Unify a raw mixed hit, or discard it when it is not a movie/show.
fn map_multi_hit(hit: RawMultiHit, query: &str) -> Option<Candidate> {
    match hit.media_type.as_deref() {
        Some("movie") => Some(map_movie_hit(
            RawMovieHit {
                id: hit.id,
                title: hit.title,
                original_title: hit.original_title,
                release_date: hit.release_date,
                popularity: hit.popularity,
                vote_count: hit.vote_count,
            },
            query,
        )),
        Some("tv") => Some(map_tv_hit(
            RawTvHit {
                id: hit.id,
                name: hit.name,
                original_name: hit.original_name,
                first_air_date: hit.first_air_date,
                popularity: hit.popularity,
                vote_count: hit.vote_count,
            },
            query,
        )),
        _ => None,
    }
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Create a new TMDB client from environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(TmdbConfig::from_env()?))
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.config.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.config.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, language: &str, extra_params: &str) -> String {
        if self.config.use_bearer {
            format!("{}/{}?language={}{}", TMDB_BASE_URL, path, language, extra_params)
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                TMDB_BASE_URL, path, self.config.api_key, language, extra_params
            )
        }
    }

    /// GET a JSON payload, retrying once on a rate-limit response.
    ///
    /// The retry delay comes from the provider's Retry-After header when
    /// present. A second rate-limit response gives up.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut resp = self.build_request(url).send().await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let delay = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_millis(RATE_LIMIT_RETRY_MS));

            tracing::warn!("TMDB rate limit hit, retrying in {:?}", delay);
            tokio::time::sleep(delay).await;

            resp = self.build_request(url).send().await?;
            if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(crate::Error::RateLimited);
            }
        }

        let resp = resp.error_for_status()?;
        Ok(resp.json().await?)
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.config.use_bearer {
            format!("{}/authentication", TMDB_BASE_URL)
        } else {
            format!(
                "{}/authentication?api_key={}",
                TMDB_BASE_URL, self.config.api_key
            )
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Search for movies.
    pub async fn search_movies(
        &self,
        query: &str,
        language: &str,
        year: Option<u16>,
    ) -> Result<Vec<Candidate>> {
        let year_param = year.map(|y| format!("&year={}", y)).unwrap_or_default();
        let url = self.build_url(
            "search/movie",
            language,
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );

        let resp: MovieSearchResponse = self.get_json(&url).await?;
        Ok(resp
            .results
            .into_iter()
            .map(|hit| map_movie_hit(hit, query))
            .collect())
    }

    /// Search for TV shows.
    pub async fn search_shows(
        &self,
        query: &str,
        language: &str,
        year: Option<u16>,
    ) -> Result<Vec<Candidate>> {
        let year_param = year
            .map(|y| format!("&first_air_date_year={}", y))
            .unwrap_or_default();
        let url = self.build_url(
            "search/tv",
            language,
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );

        let resp: TvSearchResponse = self.get_json(&url).await?;
        Ok(resp
            .results
            .into_iter()
            .map(|hit| map_tv_hit(hit, query))
            .collect())
    }

    /// Mixed-kind search, filtered to movie and show hits.
    pub async fn search_combined(&self, query: &str, language: &str) -> Result<Vec<Candidate>> {
        let url = self.build_url(
            "search/multi",
            language,
            &format!("&query={}", urlencoding::encode(query)),
        );

        let resp: MultiSearchResponse = self.get_json(&url).await?;
        Ok(resp
            .results
            .into_iter()
            .filter_map(|hit| map_multi_hit(hit, query))
            .collect())
    }

    /// Fetch the detail record for a candidate, best-effort.
    pub async fn fetch_detail(&self, candidate: &Candidate, language: &str) -> CandidateDetail {
        let result = match candidate.kind {
            MediaKind::Movie => {
                let url = self.build_url(
                    &format!("movie/{}", candidate.id),
                    language,
                    "&append_to_response=external_ids",
                );
                self.get_json::<MovieDetailResponse>(&url)
                    .await
                    .map(|d| d.imdb_id.or(d.external_ids.and_then(|e| e.imdb_id)))
            }
            MediaKind::Series => {
                let url = self.build_url(
                    &format!("tv/{}", candidate.id),
                    language,
                    "&append_to_response=external_ids",
                );
                self.get_json::<TvDetailResponse>(&url)
                    .await
                    .map(|d| d.external_ids.and_then(|e| e.imdb_id))
            }
        };

        match result {
            Ok(external_id) => CandidateDetail {
                external_id: external_id.filter(|id| !id.is_empty()),
            },
            Err(e) => {
                tracing::debug!("Detail lookup failed for {} {}: {}", candidate.kind, candidate.id, e);
                CandidateDetail::default()
            }
        }
    }

    /// Direct external-id lookup for a movie, best-effort.
    pub async fn fetch_movie_external_id(&self, movie_id: u64) -> Option<String> {
        let url = self.build_url(&format!("movie/{}/external_ids", movie_id), "en-US", "");

        match self.get_json::<RawExternalIds>(&url).await {
            Ok(ids) => ids.imdb_id.filter(|id| !id.is_empty()),
            Err(e) => {
                tracing::debug!("External id lookup failed for movie {}: {}", movie_id, e);
                None
            }
        }
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        language: &str,
        year: Option<u16>,
    ) -> Result<Vec<Candidate>> {
        match kind {
            SearchKind::Movie => self.search_movies(query, language, year).await,
            SearchKind::Show => self.search_shows(query, language, year).await,
            SearchKind::Combined => self.search_combined(query, language).await,
        }
    }

    async fn detail(&self, candidate: &Candidate, language: &str) -> CandidateDetail {
        self.fetch_detail(candidate, language).await
    }

    async fn movie_external_id(&self, catalog_id: u64) -> Option<String> {
        self.fetch_movie_external_id(catalog_id).await
    }
}
