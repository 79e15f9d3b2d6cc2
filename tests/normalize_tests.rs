//! Integration tests for query text normalization.
//!
//! Tests cover:
//! - Canonicalization (case, diacritics, punctuation, whitespace)
//! - Idempotency
//! - Query variation generation and ordering

use covermatch::core::normalize::{normalize, normalize_with, query_variations, NormalizeProfile};

// ========== NORMALIZATION TESTS ==========

#[test]
fn test_normalize_case_punctuation_whitespace() {
    assert_eq!(normalize("  Dune:   Part Two  "), "dune part two");
    assert_eq!(normalize("WALL-E"), "wall e");
    assert_eq!(normalize("Ocean's Eleven"), "ocean s eleven");
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("!!!"), "");
}

#[test]
fn test_normalize_strips_diacritics() {
    assert_eq!(normalize("Amélie"), "amelie");
    assert_eq!(normalize("Léon: The Professional"), "leon the professional");
}

#[test]
fn test_normalize_preserving_profile_keeps_diacritics() {
    assert_eq!(
        normalize_with("Amélie", NormalizeProfile::KeepDiacritics),
        "amélie"
    );
    assert_eq!(
        normalize_with("Das Boot!", NormalizeProfile::KeepDiacritics),
        "das boot"
    );
}

#[test]
fn test_normalize_keeps_non_latin_letters() {
    assert_eq!(normalize("千と千尋の神隠し"), "千と千尋の神隠し");
}

#[test]
fn test_normalize_is_idempotent() {
    let samples = [
        "Dune: Part Two",
        "  AMÉLIE!!  ",
        "The Lord of the Rings - The Two Towers",
        "WALL-E",
        "District 9",
        "千と千尋の神隠し",
    ];

    for sample in samples {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);

        let once = normalize_with(sample, NormalizeProfile::KeepDiacritics);
        assert_eq!(
            normalize_with(&once, NormalizeProfile::KeepDiacritics),
            once,
            "preserving profile not idempotent for {:?}",
            sample
        );
    }
}

// ========== QUERY VARIATION TESTS ==========

#[test]
fn test_variations_base_form_comes_first() {
    let variants = query_variations("Dune Part Two");
    assert_eq!(variants[0], "dune part two");
}

#[test]
fn test_variations_include_separator_spellings() {
    let variants = query_variations("Dune Part Two");
    assert!(variants.contains(&"dune, part, two".to_string()));
    assert!(variants.contains(&"dune - part - two".to_string()));
    assert!(variants.contains(&"dune: part: two".to_string()));
}

#[test]
fn test_variations_strip_leading_article() {
    let variants = query_variations("The Matrix");
    assert!(variants.contains(&"matrix".to_string()));

    // German article
    let variants = query_variations("Das Boot");
    assert!(variants.contains(&"boot".to_string()));
}

#[test]
fn test_variations_are_deduplicated() {
    let variants = query_variations("Inception");
    assert_eq!(variants, vec!["inception"]);

    let variants = query_variations("Dune Part Two");
    let unique: std::collections::HashSet<&String> = variants.iter().collect();
    assert_eq!(unique.len(), variants.len());
}

#[test]
fn test_variations_never_empty_for_real_input() {
    assert!(!query_variations("Heat").is_empty());
    assert!(query_variations("   ").is_empty());
}
