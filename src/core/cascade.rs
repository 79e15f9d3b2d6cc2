//! Resolution cascade.
//!
//! Turns one free-text title into a [`ResolvedMatch`] by trying language x
//! search-kind x query-variant combinations in a fixed nested order and
//! stopping at the first candidate that clears the acceptance threshold AND
//! carries an external id. A catalog hit without an external id is not a
//! usable result, so the cascade keeps going past it.
//!
//! Nesting rationale: movie search leads because scanned covers skew toward
//! movies; all variants of one locale are exhausted before switching search
//! kind, since a correct-language exact match beats a cross-kind fuzzy one;
//! the language fallback is outermost because non-English catalogs tend to
//! miss localized metadata rather than the title itself, making a full
//! re-search in the fallback locale worthwhile.

use crate::core::normalize::{normalize, query_variations};
use crate::core::scoring::select_best;
use crate::core::year::extract_year;
use crate::models::candidate::{Candidate, Confidence, MediaKind, ResolvedMatch};
use crate::models::config::ResolverConfig;
use crate::services::{CatalogSource, SearchKind};

/// Search kinds in cascade order.
const SEARCH_KINDS: [SearchKind; 3] = [SearchKind::Movie, SearchKind::Show, SearchKind::Combined];

/// Per-resolution options.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Primary search locale override.
    pub language: Option<String>,
    /// Explicit release year. When absent, the year is extracted from the
    /// title text.
    pub year: Option<u16>,
}

/// The cascade driver. One instance serves any number of independent
/// resolutions; it holds no per-title state.
pub struct TitleResolver<C> {
    catalog: C,
    config: ResolverConfig,
}

impl<C: CatalogSource> TitleResolver<C> {
    /// Create a resolver over a catalog source.
    pub fn new(catalog: C, config: ResolverConfig) -> Self {
        Self { catalog, config }
    }

    /// Access the underlying catalog source.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Resolve one raw title.
    ///
    /// Transport errors are absorbed per combination; exhausting every
    /// combination yields `None`, never an error.
    pub async fn resolve(&self, raw_title: &str, options: &ResolveOptions) -> Option<ResolvedMatch> {
        let raw_title = raw_title.trim();
        if raw_title.is_empty() {
            return None;
        }

        let extracted = extract_year(raw_title);
        let clean_title = extracted.title;
        let year_hint = options.year.or(extracted.year);

        let query_norm = normalize(&clean_title);
        if query_norm.is_empty() {
            return None;
        }

        let primary = options
            .language
            .clone()
            .unwrap_or_else(|| self.config.language.clone());
        let mut languages = vec![primary, self.config.fallback_language.clone()];
        languages.dedup();

        let variants = query_variations(&clean_title);
        tracing::debug!(
            "Resolving '{}' (year hint {:?}, {} variants, languages {:?})",
            raw_title,
            year_hint,
            variants.len(),
            languages
        );

        for language in &languages {
            for kind in SEARCH_KINDS {
                for variant in &variants {
                    let candidates = match self
                        .catalog
                        .search(kind, variant, language, year_hint)
                        .await
                    {
                        Ok(candidates) => candidates,
                        Err(e) => {
                            tracing::debug!(
                                "{} search for '{}' [{}] failed: {}",
                                kind,
                                variant,
                                language,
                                e
                            );
                            continue;
                        }
                    };

                    let Some((best, best_score)) = select_best(&candidates, &query_norm) else {
                        continue;
                    };

                    let Some(external_id) = self.lookup_external_id(best, language).await else {
                        tracing::debug!(
                            "No external id for {} {} ('{}'), continuing cascade",
                            best.kind,
                            best.id,
                            best.title
                        );
                        continue;
                    };

                    tracing::info!(
                        "Resolved '{}' -> '{}' ({}, score {:.1})",
                        raw_title,
                        best.title,
                        external_id,
                        best_score
                    );
                    return Some(ResolvedMatch {
                        title: best.title.clone(),
                        catalog_id: best.id,
                        kind: best.kind,
                        external_id: Some(external_id),
                        confidence: Confidence::from_score(best_score),
                        year: best.year(),
                    });
                }
            }
        }

        tracing::debug!("Cascade exhausted for '{}'", raw_title);
        None
    }

    /// External-id fallback chain for a chosen candidate.
    ///
    /// Detail record first; then the direct external-id endpoint (movies
    /// only); then the detail record again under the fallback locale, when
    /// the miss happened under a different one.
    async fn lookup_external_id(&self, candidate: &Candidate, language: &str) -> Option<String> {
        let detail = self.catalog.detail(candidate, language).await;
        if let Some(id) = detail.external_id {
            return Some(id);
        }

        if candidate.kind == MediaKind::Movie {
            if let Some(id) = self.catalog.movie_external_id(candidate.id).await {
                return Some(id);
            }
        }

        let fallback = &self.config.fallback_language;
        if language != fallback.as_str() {
            let detail = self.catalog.detail(candidate, fallback).await;
            if let Some(id) = detail.external_id {
                return Some(id);
            }
        }

        None
    }
}
