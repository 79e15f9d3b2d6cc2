//! Release year extraction from title strings.

use chrono::Datelike;

/// A title with its embedded release year split out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleYear {
    /// Title with the year token and surrounding punctuation removed.
    pub title: String,
    pub year: Option<u16>,
}

/// Detect an embedded release year token and split it from the title body.
///
/// Only extracts tokens that are plausibly a release year: four digits in
/// 1900..=current year + 1, either parenthesized/bracketed or trailing.
/// Anything else ("District 9", "Blade Runner 2049" while that is still in
/// the future, digits inside longer numbers) is left alone, since a false
/// positive corrupts the search query.
pub fn extract_year(title: &str) -> TitleYear {
    let current_year = chrono::Utc::now().year() as u16;
    let in_range = |y: u16| (1900..=current_year + 1).contains(&y);

    // Parenthesized or bracketed year anywhere in the string.
    if let Ok(re) = regex::Regex::new(r"[\(\[]((?:19|20)\d{2})[\)\]]") {
        if let Some(caps) = re.captures(title) {
            if let Some(year) = caps.get(1).and_then(|m| m.as_str().parse::<u16>().ok()) {
                if in_range(year) {
                    let m = caps.get(0).unwrap();
                    let clean = cleanup(&format!("{}{}", &title[..m.start()], &title[m.end()..]));
                    if !clean.is_empty() {
                        return TitleYear {
                            title: clean,
                            year: Some(year),
                        };
                    }
                }
            }
        }
    }

    // Bare year at the end of the string.
    if let Ok(re) = regex::Regex::new(r"(?:^|[\s\.])((?:19|20)\d{2})\s*$") {
        if let Some(caps) = re.captures(title) {
            if let Some(year) = caps.get(1).and_then(|m| m.as_str().parse::<u16>().ok()) {
                if in_range(year) {
                    let start = caps.get(1).unwrap().start();
                    let clean = cleanup(&title[..start]);
                    if !clean.is_empty() {
                        return TitleYear {
                            title: clean,
                            year: Some(year),
                        };
                    }
                }
            }
        }
    }

    TitleYear {
        title: title.to_string(),
        year: None,
    }
}

/// Trim whitespace and dangling separators left behind by token removal.
fn cleanup(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ',' | ':' | '.' | '·'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized_year() {
        let result = extract_year("Inception (2010)");
        assert_eq!(result.title, "Inception");
        assert_eq!(result.year, Some(2010));
    }

    #[test]
    fn test_trailing_year() {
        let result = extract_year("Dune Part Two 2024");
        assert_eq!(result.title, "Dune Part Two");
        assert_eq!(result.year, Some(2024));
    }

    #[test]
    fn test_short_number_is_not_a_year() {
        let result = extract_year("District 9");
        assert_eq!(result.title, "District 9");
        assert_eq!(result.year, None);
    }

    #[test]
    fn test_year_only_title_is_left_alone() {
        let result = extract_year("1917");
        assert_eq!(result.title, "1917");
        assert_eq!(result.year, None);
    }
}
