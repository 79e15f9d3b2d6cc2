//! Core data types for title resolution.
//!
//! A [`Candidate`] is the unified representation of one catalog search hit,
//! regardless of which search endpoint produced it. The raw provider shapes
//! stay inside `services::tmdb`; everything downstream of the fetcher works
//! with these types only.

use serde::{Deserialize, Serialize};

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
        }
    }
}

/// Unified search hit from the catalog provider.
///
/// Produced fresh per search call and owned by a single resolution attempt;
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Numeric catalog id (TMDB).
    pub id: u64,
    pub kind: MediaKind,
    /// Display title. Never empty after mapping: falls back from the primary
    /// title field to the original-language title to the query itself.
    pub title: String,
    /// Original-language title, when it differs from the display title.
    pub original_title: Option<String>,
    /// Release date (movies) or first air date (series), `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
    pub vote_count: Option<u64>,
}

impl Candidate {
    /// Release/air year, when a date is present.
    pub fn year(&self) -> Option<u16> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

/// Coarse confidence bucket derived from the match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Pure step function of the match score: `>= 80` high, `>= 40` medium,
    /// below that low.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Confidence::High
        } else if score >= 40.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Outcome of a successful cascade iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedMatch {
    /// Canonical title from the catalog.
    pub title: String,
    /// Numeric catalog id of the chosen candidate.
    pub catalog_id: u64,
    pub kind: MediaKind,
    /// Rating-provider identifier (IMDB id). The cascade only returns
    /// matches where this is present.
    pub external_id: Option<String>,
    pub confidence: Confidence,
    pub year: Option<u16>,
}

/// Rating data from the rating provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRecord {
    pub external_id: String,
    /// Numeric rating. The provider's "N/A" sentinel maps to `None`.
    pub rating: Option<f32>,
    /// Vote count as reported (e.g. "1,234,567"). "N/A" maps to `None`.
    pub votes: Option<String>,
    pub provider: String,
}

/// Final record handed back to callers: source query joined with the
/// resolved match and its rating.
///
/// Invariant: `external_id` present implies a rating lookup was attempted;
/// `external_id` absent implies the rating fields are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedResult {
    /// The raw input title, echoed back so batch callers can key results.
    pub query: String,
    pub title: String,
    pub catalog_id: u64,
    pub kind: MediaKind,
    pub external_id: Option<String>,
    pub confidence: Confidence,
    pub year: Option<u16>,
    pub rating: Option<f32>,
    pub votes: Option<String>,
}

impl EnrichedResult {
    /// Join a resolved match with an optional rating record.
    pub fn new(query: &str, resolved: ResolvedMatch, rating: Option<RatingRecord>) -> Self {
        Self {
            query: query.to_string(),
            title: resolved.title,
            catalog_id: resolved.catalog_id,
            kind: resolved.kind,
            external_id: resolved.external_id,
            confidence: resolved.confidence,
            year: resolved.year,
            rating: rating.as_ref().and_then(|r| r.rating),
            votes: rating.and_then(|r| r.votes),
        }
    }
}
