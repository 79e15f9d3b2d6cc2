//! End-to-end resolution pipeline.
//!
//! Joins the cascade with rating enrichment and provides the batch entry
//! point. This is the surface the CLI (and any other presentation layer)
//! talks to.

use crate::core::cascade::{ResolveOptions, TitleResolver};
use crate::core::enrich::RatingEnricher;
use crate::models::candidate::EnrichedResult;
use crate::models::config::ResolverConfig;
use crate::services::{CatalogSource, RatingSource};
use std::time::Duration;

/// Cascade plus enrichment over concrete provider sources.
pub struct ResolutionPipeline<C, R> {
    resolver: TitleResolver<C>,
    enricher: RatingEnricher<R>,
    group_size: usize,
    group_delay: Duration,
}

impl<C: CatalogSource, R: RatingSource> ResolutionPipeline<C, R> {
    /// Create a pipeline over a catalog and a rating source.
    pub fn new(catalog: C, rating: R, config: ResolverConfig) -> Self {
        let enricher = RatingEnricher::new(rating, &config);
        let group_size = config.resolve_group_size.max(1);
        let group_delay = Duration::from_millis(config.group_delay_ms);
        Self {
            resolver: TitleResolver::new(catalog, config),
            enricher,
            group_size,
            group_delay,
        }
    }

    /// Resolve one raw title to an enriched result.
    ///
    /// A present external id always triggers a rating lookup; when the id or
    /// the rating is absent, the rating fields stay `None`.
    pub async fn resolve_title(
        &self,
        raw_title: &str,
        options: &ResolveOptions,
    ) -> Option<EnrichedResult> {
        let resolved = self.resolver.resolve(raw_title, options).await?;

        let rating = match resolved.external_id {
            Some(ref id) => self.enricher.enrich(id).await,
            None => None,
        };

        Some(EnrichedResult::new(raw_title, resolved, rating))
    }

    /// Resolve many titles, a bounded group at a time.
    ///
    /// Groups run concurrently within themselves with a short pause between
    /// groups, purely to respect the upstream provider's rate limit. Failed
    /// members are filtered out, so positional alignment with the input is
    /// not guaranteed; callers key results by the echoed `query` field.
    pub async fn resolve_titles_batch(
        &self,
        titles: &[String],
        options: &ResolveOptions,
    ) -> Vec<EnrichedResult> {
        let mut results = Vec::new();

        for (i, group) in titles.chunks(self.group_size).enumerate() {
            if i > 0 {
                tokio::time::sleep(self.group_delay).await;
            }
            let resolutions = group.iter().map(|title| self.resolve_title(title, options));
            results.extend(
                futures::future::join_all(resolutions)
                    .await
                    .into_iter()
                    .flatten(),
            );
        }

        results
    }
}
