//! Candidate relevance scoring.
//!
//! The score combines tiered text similarity with popularity, vote-count and
//! recency signals. Text similarity dominates; the catalog signals separate
//! same-title entries (sequels, remakes, obscure namesakes) where text alone
//! ties.

use crate::core::normalize::normalize;
use crate::models::candidate::Candidate;
use chrono::Datelike;

/// Minimum score a candidate must exceed to count as a match at all.
/// Below this, "no match" is the correct answer rather than "low confidence".
pub const ACCEPTANCE_THRESHOLD: f64 = 20.0;

const EXACT_SCORE: f64 = 100.0;
const PREFIX_SCORE: f64 = 60.0;
const SUBSTRING_SCORE: f64 = 40.0;

const TOKEN_BONUS_MAX: f64 = 30.0;
const TOKEN_PENALTY_PER_EXTRA: f64 = 5.0;
const TOKEN_PENALTY_MAX: f64 = 20.0;

// Logarithmic so a handful of very popular entries don't drown out
// moderately popular ones. Vote count is weighted above popularity: it
// correlates better with "the well-known entry the user means".
const POPULARITY_CAP: f64 = 20.0;
const POPULARITY_FACTOR: f64 = 6.0;
const VOTES_CAP: f64 = 30.0;
const VOTES_FACTOR: f64 = 10.0;

const RECENT_YEARS: u16 = 5;
const OLD_YEARS: u16 = 20;
const RECENT_BONUS: f64 = 15.0;
const OLD_PENALTY: f64 = 10.0;

/// Score a candidate against an already-normalized query title.
///
/// Deterministic and free of side effects; the only ambient input is the
/// current date for the recency term.
pub fn score(candidate: &Candidate, normalized_query: &str) -> f64 {
    let title_norm = normalize(&candidate.title);

    let mut text = text_tier(&title_norm, normalized_query);
    if let Some(ref original) = candidate.original_title {
        text = text.max(text_tier(&normalize(original), normalized_query));
    }

    let mut total = text;
    total += token_overlap(&title_norm, normalized_query);

    if let Some(popularity) = candidate.popularity {
        total += ((popularity + 1.0).log10() * POPULARITY_FACTOR).min(POPULARITY_CAP);
    }
    if let Some(votes) = candidate.vote_count {
        total += ((votes as f64 + 1.0).log10() * VOTES_FACTOR).min(VOTES_CAP);
    }

    total += recency_adjustment(candidate);
    total
}

/// Tiered textual similarity: exact, prefix, substring, nothing.
fn text_tier(candidate_norm: &str, query_norm: &str) -> f64 {
    if candidate_norm.is_empty() || query_norm.is_empty() {
        return 0.0;
    }
    if candidate_norm == query_norm {
        EXACT_SCORE
    } else if candidate_norm.starts_with(query_norm) || query_norm.starts_with(candidate_norm) {
        PREFIX_SCORE
    } else if candidate_norm.contains(query_norm) || query_norm.contains(candidate_norm) {
        SUBSTRING_SCORE
    } else {
        0.0
    }
}

/// Token-overlap refinement.
///
/// Rewards candidates covering the query's significant words and penalizes
/// over-broad candidates carrying many words the query never asked for.
fn token_overlap(candidate_norm: &str, query_norm: &str) -> f64 {
    let query_tokens: Vec<&str> = query_norm
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .collect();
    let candidate_tokens: Vec<&str> = candidate_norm
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .collect();

    if query_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0.0;
    }

    let matched = query_tokens
        .iter()
        .filter(|q| candidate_tokens.iter().any(|c| tokens_overlap(q, c)))
        .count();
    let ratio = matched as f64 / query_tokens.len() as f64;

    let extra = candidate_tokens
        .iter()
        .filter(|c| !query_tokens.iter().any(|q| tokens_overlap(q, c)))
        .count();
    let penalty = (extra as f64 * TOKEN_PENALTY_PER_EXTRA).min(TOKEN_PENALTY_MAX);

    TOKEN_BONUS_MAX * ratio - penalty
}

/// Exact token match, or fuzzy containment for long-enough tokens.
fn tokens_overlap(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    a.chars().count() > 4 && b.chars().count() > 4 && (a.contains(b) || b.contains(a))
}

/// Bias ambiguous titles toward the newer entry.
///
/// A scanned cover is usually a recent purchase or stream, so sequels and
/// remakes should beat their decades-old namesakes.
fn recency_adjustment(candidate: &Candidate) -> f64 {
    let Some(year) = candidate.year() else {
        return 0.0;
    };
    let current_year = chrono::Utc::now().year() as u16;
    let age = current_year.saturating_sub(year);

    if age <= RECENT_YEARS {
        RECENT_BONUS
    } else if age > OLD_YEARS {
        -OLD_PENALTY
    } else {
        0.0
    }
}

/// Score every candidate and pick the maximum.
///
/// Returns `None` for an empty list or when the best score does not exceed
/// the acceptance threshold. Ties break on input order (first seen wins):
/// within one search call the provider's own ordering already reflects
/// relevance.
pub fn select_best<'a>(
    candidates: &'a [Candidate],
    normalized_query: &str,
) -> Option<(&'a Candidate, f64)> {
    let mut best: Option<(&Candidate, f64)> = None;

    for candidate in candidates {
        let s = score(candidate, normalized_query);
        tracing::trace!("candidate {} '{}' scored {:.1}", candidate.id, candidate.title, s);
        match best {
            Some((_, current)) if s <= current => {}
            _ => best = Some((candidate, s)),
        }
    }

    best.filter(|(_, s)| *s > ACCEPTANCE_THRESHOLD)
}
