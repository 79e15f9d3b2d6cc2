//! External provider clients.
//!
//! The cascade and enricher depend on the [`CatalogSource`] and
//! [`RatingSource`] seams rather than the concrete clients, so resolution
//! logic can be exercised against in-memory fakes.

pub mod omdb;
pub mod tmdb;

use crate::models::candidate::{Candidate, RatingRecord};
use crate::Result;
use async_trait::async_trait;

/// Which search endpoint to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Movie,
    Show,
    /// Mixed-kind search, filtered down to movie/show hits.
    Combined,
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKind::Movie => write!(f, "movie"),
            SearchKind::Show => write!(f, "show"),
            SearchKind::Combined => write!(f, "combined"),
        }
    }
}

/// Detail record for one candidate.
#[derive(Debug, Clone, Default)]
pub struct CandidateDetail {
    /// Rating-provider identifier (IMDB id), when the catalog knows it.
    pub external_id: Option<String>,
}

/// Search/detail access to the movie catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search the first results page. Transport failures propagate; the
    /// cascade treats them as "this combination produced nothing".
    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        language: &str,
        year: Option<u16>,
    ) -> Result<Vec<Candidate>>;

    /// Fetch the detail record for a candidate. Best-effort: errors come
    /// back as an empty detail, never as `Err`.
    async fn detail(&self, candidate: &Candidate, language: &str) -> CandidateDetail;

    /// Direct external-id lookup for a movie, as a secondary fallback when
    /// the detail record lacks one. Best-effort.
    async fn movie_external_id(&self, catalog_id: u64) -> Option<String>;
}

/// Lookup-by-id access to the rating provider.
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// Fetch the rating record for an external id. A provider-level
    /// "not found" is `Ok(None)`, not an error.
    async fn lookup(&self, external_id: &str) -> Result<Option<RatingRecord>>;
}
