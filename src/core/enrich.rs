//! Rating enrichment.

use crate::models::candidate::RatingRecord;
use crate::models::config::ResolverConfig;
use crate::services::RatingSource;
use std::time::Duration;

/// Fetches public ratings for resolved external ids, tolerating absence.
pub struct RatingEnricher<R> {
    source: R,
    group_size: usize,
    group_delay: Duration,
}

impl<R: RatingSource> RatingEnricher<R> {
    /// Create an enricher over a rating source.
    pub fn new(source: R, config: &ResolverConfig) -> Self {
        Self {
            source,
            group_size: config.rating_group_size.max(1),
            group_delay: Duration::from_millis(config.group_delay_ms),
        }
    }

    /// Look up the rating for one external id.
    ///
    /// Provider misses and transport failures both come back as `None`; a
    /// resolution stays useful without its rating.
    pub async fn enrich(&self, external_id: &str) -> Option<RatingRecord> {
        match self.source.lookup(external_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Rating lookup failed for {}: {}", external_id, e);
                None
            }
        }
    }

    /// Look up ratings for many external ids in bounded groups.
    ///
    /// Output order matches input order; a missing rating is `None` at the
    /// corresponding index.
    pub async fn enrich_batch(&self, external_ids: &[String]) -> Vec<Option<RatingRecord>> {
        let mut results = Vec::with_capacity(external_ids.len());

        for (i, group) in external_ids.chunks(self.group_size).enumerate() {
            if i > 0 {
                tokio::time::sleep(self.group_delay).await;
            }
            let lookups = group.iter().map(|id| self.enrich(id));
            results.extend(futures::future::join_all(lookups).await);
        }

        results
    }
}
