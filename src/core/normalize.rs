//! Query text normalization.
//!
//! OCR output is noisy: mixed case, stray punctuation, diacritics that may or
//! may not match the catalog's spelling. Everything that compares titles goes
//! through [`normalize`] so both sides land in the same canonical form.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalization profile.
///
/// Matching is language-sensitive: for Latin-script locales folding "Amélie"
/// to "amelie" widens recall, but some catalogs key localized titles on the
/// accented form. Both profiles share the same pipeline otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeProfile {
    /// Strip combining diacritical marks after decomposition.
    AsciiFold,
    /// Keep diacritics, recomposed to their canonical form.
    KeepDiacritics,
}

/// Canonicalize text with the strict ASCII-folding profile.
///
/// Lowercases, applies Unicode canonical decomposition, strips combining
/// marks, removes everything outside the letter/digit/space classes,
/// collapses whitespace and trims. Idempotent.
pub fn normalize(text: &str) -> String {
    normalize_with(text, NormalizeProfile::AsciiFold)
}

/// Canonicalize text with an explicit profile.
pub fn normalize_with(text: &str, profile: NormalizeProfile) -> String {
    let lowered = text.to_lowercase();

    let stripped: String = match profile {
        NormalizeProfile::AsciiFold => lowered
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect(),
        NormalizeProfile::KeepDiacritics => lowered.nfc().collect(),
    };

    let cleaned: String = stripped
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Leading articles dropped for the article-stripped query variant.
///
/// Covers English plus the articles of the locales the resolver is usually
/// pointed at (de/fr/es/it).
const ARTICLES: &[&str] = &[
    "the", "a", "an", "der", "die", "das", "ein", "eine", "le", "la", "les", "un", "une", "el",
    "los", "las", "il", "lo",
];

/// Generate ordered query spellings for a title.
///
/// Cover text loses separators: "Title: Subtitle" photographs as
/// "Title Subtitle". The variants re-introduce the common subtitle
/// conventions so the cascade can try them in turn. More likely spellings
/// come first since the cascade stops at the first acceptable match.
/// Duplicates are collapsed preserving first occurrence.
pub fn query_variations(text: &str) -> Vec<String> {
    let base = normalize(text);
    let tokens: Vec<&str> = base.split_whitespace().collect();

    let mut variants = vec![base.clone()];

    if tokens.len() >= 2 {
        variants.push(tokens.join(", "));
        variants.push(tokens.join(" - "));
        variants.push(tokens.join(": "));
    }

    if tokens.len() >= 2 && ARTICLES.contains(&tokens[0]) {
        variants.push(tokens[1..].join(" "));
    }

    let mut seen = std::collections::HashSet::new();
    variants.retain(|v| !v.is_empty() && seen.insert(v.clone()));
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Dune: Part Two  "), "dune part two");
        assert_eq!(normalize("WALL·E"), "wall e");
    }

    #[test]
    fn test_normalize_profiles() {
        assert_eq!(normalize("Amélie"), "amelie");
        assert_eq!(
            normalize_with("Amélie", NormalizeProfile::KeepDiacritics),
            "amélie"
        );
    }

    #[test]
    fn test_variations_single_token() {
        assert_eq!(query_variations("Inception"), vec!["inception"]);
    }
}
