//! End-to-end tests for the resolution cascade and pipeline.
//!
//! Tests cover:
//! - Happy path resolution (exact recent match, first combination wins)
//! - Exhaustion across every language/search-kind/variant combination
//! - External-id fallback chain (detail, direct lookup, fallback language)
//! - Transport-error recovery
//! - Rating enrichment absence handling
//! - Batch partial-failure isolation

use async_trait::async_trait;
use covermatch::core::cascade::{ResolveOptions, TitleResolver};
use covermatch::core::normalize::query_variations;
use covermatch::core::pipeline::ResolutionPipeline;
use covermatch::models::candidate::{Candidate, Confidence, MediaKind, RatingRecord};
use covermatch::models::config::ResolverConfig;
use covermatch::services::{CandidateDetail, CatalogSource, RatingSource, SearchKind};
use covermatch::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;

fn test_config() -> ResolverConfig {
    ResolverConfig {
        language: "de-DE".to_string(),
        fallback_language: "en-US".to_string(),
        resolve_group_size: 3,
        rating_group_size: 5,
        group_delay_ms: 0,
    }
}

fn movie(id: u64, title: &str, popularity: f64, votes: u64, date: &str) -> Candidate {
    Candidate {
        id,
        kind: MediaKind::Movie,
        title: title.to_string(),
        original_title: None,
        release_date: Some(date.to_string()),
        popularity: Some(popularity),
        vote_count: Some(votes),
    }
}

/// In-memory catalog fake. Search hits are keyed by language; detail
/// records by (candidate id, language).
#[derive(Default)]
struct FakeCatalog {
    movies: HashMap<String, Vec<Candidate>>,
    shows: HashMap<String, Vec<Candidate>>,
    detail_ids: HashMap<(u64, String), String>,
    direct_ids: HashMap<u64, String>,
    /// Queries containing this substring fail with a transport error.
    fail_substring: Option<String>,
    /// All searches under this language fail with a transport error.
    fail_language: Option<String>,
    search_log: Mutex<Vec<(SearchKind, String, String)>>,
    detail_log: Mutex<Vec<(u64, String)>>,
}

impl FakeCatalog {
    fn with_movie(mut self, language: &str, candidate: Candidate) -> Self {
        self.movies
            .entry(language.to_string())
            .or_default()
            .push(candidate);
        self
    }

    fn with_show(mut self, language: &str, candidate: Candidate) -> Self {
        self.shows
            .entry(language.to_string())
            .or_default()
            .push(candidate);
        self
    }

    fn with_detail_id(mut self, id: u64, language: &str, imdb_id: &str) -> Self {
        self.detail_ids
            .insert((id, language.to_string()), imdb_id.to_string());
        self
    }

    fn with_direct_id(mut self, id: u64, imdb_id: &str) -> Self {
        self.direct_ids.insert(id, imdb_id.to_string());
        self
    }

    fn searches(&self) -> Vec<(SearchKind, String, String)> {
        self.search_log.lock().unwrap().clone()
    }

    fn details(&self) -> Vec<(u64, String)> {
        self.detail_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        language: &str,
        _year: Option<u16>,
    ) -> Result<Vec<Candidate>> {
        self.search_log
            .lock()
            .unwrap()
            .push((kind, query.to_string(), language.to_string()));

        if let Some(ref needle) = self.fail_substring {
            if query.contains(needle.as_str()) {
                return Err(Error::other("connection reset"));
            }
        }
        if self.fail_language.as_deref() == Some(language) {
            return Err(Error::other("connection reset"));
        }

        let empty = Vec::new();
        let movies = self.movies.get(language).unwrap_or(&empty);
        let shows = self.shows.get(language).unwrap_or(&empty);

        Ok(match kind {
            SearchKind::Movie => movies.clone(),
            SearchKind::Show => shows.clone(),
            SearchKind::Combined => movies.iter().chain(shows.iter()).cloned().collect(),
        })
    }

    async fn detail(&self, candidate: &Candidate, language: &str) -> CandidateDetail {
        self.detail_log
            .lock()
            .unwrap()
            .push((candidate.id, language.to_string()));

        CandidateDetail {
            external_id: self
                .detail_ids
                .get(&(candidate.id, language.to_string()))
                .cloned(),
        }
    }

    async fn movie_external_id(&self, catalog_id: u64) -> Option<String> {
        self.direct_ids.get(&catalog_id).cloned()
    }
}

/// In-memory rating fake.
#[derive(Default)]
struct FakeRating {
    records: HashMap<String, RatingRecord>,
    fail: bool,
}

impl FakeRating {
    fn with_record(mut self, record: RatingRecord) -> Self {
        self.records.insert(record.external_id.clone(), record);
        self
    }

    fn failing() -> Self {
        Self {
            records: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl RatingSource for FakeRating {
    async fn lookup(&self, external_id: &str) -> Result<Option<RatingRecord>> {
        if self.fail {
            return Err(Error::other("rating provider unreachable"));
        }
        Ok(self.records.get(external_id).cloned())
    }
}

// ========== CASCADE TESTS ==========

#[tokio::test]
async fn test_exact_recent_match_resolves_with_high_confidence() {
    let hit = movie(693134, "Dune: Part Two", 500.0, 6000, "2024-02-27");
    let catalog = FakeCatalog::default()
        .with_movie("de-DE", hit)
        .with_detail_id(693134, "de-DE", "tt15239678");

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver
        .resolve("Dune Part Two 2024", &ResolveOptions::default())
        .await
        .expect("should resolve");

    assert_eq!(resolved.title, "Dune: Part Two");
    assert_eq!(resolved.catalog_id, 693134);
    assert_eq!(resolved.kind, MediaKind::Movie);
    assert_eq!(resolved.external_id.as_deref(), Some("tt15239678"));
    assert_eq!(resolved.confidence, Confidence::High);
    assert_eq!(resolved.year, Some(2024));
}

#[tokio::test]
async fn test_first_combination_wins_and_stops_the_cascade() {
    let hit = movie(603, "The Matrix", 80.0, 25000, "1999-03-30");
    let catalog = FakeCatalog::default()
        .with_movie("de-DE", hit)
        .with_detail_id(603, "de-DE", "tt0133093");

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver
        .resolve("The Matrix", &ResolveOptions::default())
        .await
        .expect("should resolve");
    assert_eq!(resolved.external_id.as_deref(), Some("tt0133093"));

    // The first movie search in the primary locale already succeeded, so no
    // later combination may have run.
    let searches = resolver.catalog().searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].0, SearchKind::Movie);
    assert_eq!(searches[0].2, "de-DE");
}

#[tokio::test]
async fn test_series_resolve_via_show_search() {
    let hit = Candidate {
        id: 1396,
        kind: MediaKind::Series,
        title: "Breaking Bad".to_string(),
        original_title: None,
        release_date: Some("2008-01-20".to_string()),
        popularity: Some(200.0),
        vote_count: Some(12000),
    };
    let catalog = FakeCatalog::default()
        .with_show("de-DE", hit)
        .with_detail_id(1396, "de-DE", "tt0903747");

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver
        .resolve("Breaking Bad", &ResolveOptions::default())
        .await
        .expect("should resolve");

    assert_eq!(resolved.kind, MediaKind::Series);
    assert_eq!(resolved.external_id.as_deref(), Some("tt0903747"));
    assert_eq!(resolved.year, Some(2008));
}

#[tokio::test]
async fn test_no_match_exhausts_every_combination() {
    let title = "XYZQ Not A Real Movie";
    let catalog = FakeCatalog::default();
    let resolver = TitleResolver::new(catalog, test_config());

    let resolved = resolver.resolve(title, &ResolveOptions::default()).await;
    assert!(resolved.is_none());

    let variants = query_variations(title).len();
    let searches = resolver.catalog().searches();

    // languages x search kinds x variants
    assert_eq!(searches.len(), 2 * 3 * variants);
    assert!(searches.iter().any(|(_, _, lang)| lang == "de-DE"));
    assert!(searches.iter().any(|(_, _, lang)| lang == "en-US"));
    for kind in [SearchKind::Movie, SearchKind::Show, SearchKind::Combined] {
        assert!(searches.iter().any(|(k, _, _)| *k == kind));
    }
}

#[tokio::test]
async fn test_missing_external_id_is_not_a_usable_result() {
    // Catalog search finds a strong candidate, but no detail or
    // cross-reference lookup ever yields an external id.
    let hit = movie(42, "Heat", 60.0, 15000, "1995-12-15");
    let catalog = FakeCatalog::default()
        .with_movie("de-DE", hit.clone())
        .with_movie("en-US", hit);

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver.resolve("Heat", &ResolveOptions::default()).await;

    assert!(resolved.is_none());

    // The id fallback chain ran: primary-language detail and the
    // fallback-language retry.
    let details = resolver.catalog().details();
    assert!(details.contains(&(42, "de-DE".to_string())));
    assert!(details.contains(&(42, "en-US".to_string())));
}

#[tokio::test]
async fn test_direct_external_id_fallback_for_movies() {
    let hit = movie(550, "Fight Club", 70.0, 28000, "1999-10-15");
    let catalog = FakeCatalog::default()
        .with_movie("de-DE", hit)
        .with_direct_id(550, "tt0137523");

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver
        .resolve("Fight Club", &ResolveOptions::default())
        .await
        .expect("should resolve via direct external-id lookup");

    assert_eq!(resolved.external_id.as_deref(), Some("tt0137523"));
}

#[tokio::test]
async fn test_fallback_language_detail_retry() {
    // The localized detail record lacks the id; the fallback-locale record
    // has it.
    let hit = movie(680, "Pulp Fiction", 65.0, 27000, "1994-09-10");
    let catalog = FakeCatalog::default()
        .with_movie("de-DE", hit)
        .with_detail_id(680, "en-US", "tt0110912");

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver
        .resolve("Pulp Fiction", &ResolveOptions::default())
        .await
        .expect("should resolve via fallback-language detail");

    assert_eq!(resolved.external_id.as_deref(), Some("tt0110912"));
    let details = resolver.catalog().details();
    assert_eq!(details.first(), Some(&(680, "de-DE".to_string())));
    assert!(details.contains(&(680, "en-US".to_string())));
}

#[tokio::test]
async fn test_fallback_language_search_after_primary_misses() {
    // The title only exists in the fallback-locale catalog.
    let hit = movie(238, "The Godfather", 90.0, 20000, "1972-03-14");
    let catalog = FakeCatalog::default()
        .with_movie("en-US", hit)
        .with_detail_id(238, "en-US", "tt0068646");

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver
        .resolve("The Godfather", &ResolveOptions::default())
        .await
        .expect("should resolve in the fallback locale");

    assert_eq!(resolved.external_id.as_deref(), Some("tt0068646"));

    // Every primary-locale combination ran before the first fallback one.
    let searches = resolver.catalog().searches();
    let first_fallback = searches
        .iter()
        .position(|(_, _, lang)| lang == "en-US")
        .expect("fallback locale was searched");
    assert!(searches[..first_fallback]
        .iter()
        .all(|(_, _, lang)| lang == "de-DE"));
    let variants = query_variations("The Godfather").len();
    assert_eq!(first_fallback, 3 * variants);
}

#[tokio::test]
async fn test_transport_errors_skip_to_next_combination() {
    // Every primary-locale search dies on the wire; the fallback locale
    // still resolves.
    let hit = movie(27205, "Inception", 75.0, 30000, "2010-07-15");
    let mut catalog = FakeCatalog::default()
        .with_movie("en-US", hit)
        .with_detail_id(27205, "en-US", "tt1375666");
    catalog.fail_language = Some("de-DE".to_string());

    let resolver = TitleResolver::new(catalog, test_config());
    let resolved = resolver
        .resolve("Inception", &ResolveOptions::default())
        .await
        .expect("should resolve despite primary-locale failures");

    assert_eq!(resolved.external_id.as_deref(), Some("tt1375666"));

    // The primary locale was fully attempted before falling back.
    let variants = query_variations("Inception").len();
    let searches = resolver.catalog().searches();
    assert_eq!(
        searches
            .iter()
            .filter(|(_, _, lang)| lang == "de-DE")
            .count(),
        3 * variants
    );
}

// ========== PIPELINE TESTS ==========

fn dune_catalog() -> FakeCatalog {
    FakeCatalog::default()
        .with_movie(
            "de-DE",
            movie(693134, "Dune: Part Two", 500.0, 6000, "2024-02-27"),
        )
        .with_detail_id(693134, "de-DE", "tt15239678")
}

#[tokio::test]
async fn test_pipeline_joins_rating_into_result() {
    let rating = FakeRating::default().with_record(RatingRecord {
        external_id: "tt15239678".to_string(),
        rating: Some(8.5),
        votes: Some("612,431".to_string()),
        provider: "omdb".to_string(),
    });

    let pipeline = ResolutionPipeline::new(dune_catalog(), rating, test_config());
    let result = pipeline
        .resolve_title("Dune Part Two 2024", &ResolveOptions::default())
        .await
        .expect("should resolve");

    assert_eq!(result.query, "Dune Part Two 2024");
    assert_eq!(result.rating, Some(8.5));
    assert_eq!(result.votes.as_deref(), Some("612,431"));
}

#[tokio::test]
async fn test_pipeline_absent_rating_leaves_fields_none() {
    // Provider-level "not found": the resolution itself stays useful.
    let pipeline = ResolutionPipeline::new(dune_catalog(), FakeRating::default(), test_config());
    let result = pipeline
        .resolve_title("Dune Part Two 2024", &ResolveOptions::default())
        .await
        .expect("should resolve");

    assert_eq!(result.external_id.as_deref(), Some("tt15239678"));
    assert_eq!(result.rating, None);
    assert_eq!(result.votes, None);
}

#[tokio::test]
async fn test_pipeline_rating_transport_error_is_absorbed() {
    let pipeline = ResolutionPipeline::new(dune_catalog(), FakeRating::failing(), test_config());
    let result = pipeline
        .resolve_title("Dune Part Two 2024", &ResolveOptions::default())
        .await
        .expect("should resolve despite rating failure");

    assert_eq!(result.rating, None);
    assert_eq!(result.votes, None);
}

#[tokio::test]
async fn test_pipeline_na_sentinel_rating_stays_none() {
    // A record whose provider payload carried "N/A" maps to a None rating,
    // never NaN or a sentinel string.
    let rating = FakeRating::default().with_record(RatingRecord {
        external_id: "tt15239678".to_string(),
        rating: None,
        votes: None,
        provider: "omdb".to_string(),
    });

    let pipeline = ResolutionPipeline::new(dune_catalog(), rating, test_config());
    let result = pipeline
        .resolve_title("Dune Part Two 2024", &ResolveOptions::default())
        .await
        .expect("should resolve");

    assert_eq!(result.rating, None);
}

// ========== BATCH TESTS ==========

#[tokio::test]
async fn test_batch_partial_failure_isolation() {
    let mut catalog = FakeCatalog::default()
        .with_movie("de-DE", movie(949, "Heat", 60.0, 15000, "1995-12-15"))
        .with_movie("de-DE", movie(348, "Alien", 55.0, 14000, "1979-05-25"))
        .with_detail_id(949, "de-DE", "tt0113277")
        .with_detail_id(348, "de-DE", "tt0078748");
    // Every search for the middle title errors out.
    catalog.fail_substring = Some("broken".to_string());

    let pipeline = ResolutionPipeline::new(catalog, FakeRating::default(), test_config());
    let titles = vec![
        "Heat".to_string(),
        "broken query".to_string(),
        "Alien".to_string(),
    ];
    let results = pipeline
        .resolve_titles_batch(&titles, &ResolveOptions::default())
        .await;

    let queries: Vec<&str> = results.iter().map(|r| r.query.as_str()).collect();
    assert_eq!(queries.len(), 2);
    assert!(queries.contains(&"Heat"));
    assert!(queries.contains(&"Alien"));
}

#[tokio::test]
async fn test_batch_results_echo_their_query() {
    let catalog = FakeCatalog::default()
        .with_movie("de-DE", movie(949, "Heat", 60.0, 15000, "1995-12-15"))
        .with_detail_id(949, "de-DE", "tt0113277");

    let pipeline = ResolutionPipeline::new(catalog, FakeRating::default(), test_config());
    let titles = vec!["Heat".to_string(), "No Such Film Qqzz".to_string()];
    let results = pipeline
        .resolve_titles_batch(&titles, &ResolveOptions::default())
        .await;

    // Alignment is not guaranteed; results are keyed by the echoed query.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].query, "Heat");
    assert_eq!(results[0].external_id.as_deref(), Some("tt0113277"));
}

#[tokio::test]
async fn test_rating_batch_keeps_input_order_with_gaps() {
    use covermatch::core::enrich::RatingEnricher;

    let rating = FakeRating::default()
        .with_record(RatingRecord {
            external_id: "tt0113277".to_string(),
            rating: Some(8.3),
            votes: Some("740,000".to_string()),
            provider: "omdb".to_string(),
        })
        .with_record(RatingRecord {
            external_id: "tt0078748".to_string(),
            rating: Some(8.5),
            votes: Some("950,000".to_string()),
            provider: "omdb".to_string(),
        });

    let enricher = RatingEnricher::new(rating, &test_config());
    let ids = vec![
        "tt0113277".to_string(),
        "tt9999999".to_string(),
        "tt0078748".to_string(),
    ];
    let records = enricher.enrich_batch(&ids).await;

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].as_ref().and_then(|r| r.rating), Some(8.3));
    assert!(records[1].is_none());
    assert_eq!(records[2].as_ref().and_then(|r| r.rating), Some(8.5));
}
