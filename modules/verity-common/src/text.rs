const NEWS_STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
];

const SOCIAL_STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
    "of", "as", "by",
];

/// Keywords for a news search: lowercased words longer than three characters
/// that are not stop words, in order of appearance.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| !NEWS_STOP_WORDS.contains(w) && w.chars().count() > 3)
        .take(max_keywords)
        .map(str::to_string)
        .collect()
}

/// Search terms for social platforms: trailing/leading punctuation stripped,
/// longer than two characters, not stop words.
pub fn extract_search_terms(text: &str, max_terms: usize) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| ".,!?;:".contains(c)))
        .filter(|w| !SOCIAL_STOP_WORDS.contains(w) && w.chars().count() > 2)
        .take(max_terms)
        .map(str::to_string)
        .collect()
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_skip_stop_words_and_short_words() {
        let kw = extract_keywords("The president is at the summit with new trade deals", 5);
        assert_eq!(kw, vec!["president", "summit", "trade", "deals"]);
    }

    #[test]
    fn keywords_are_capped() {
        let kw = extract_keywords("alpha bravo charlie delta echo foxtrot golf", 3);
        assert_eq!(kw, vec!["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn search_terms_strip_punctuation() {
        let terms = extract_search_terms("Scientists, by the way, discover NEW planet!", 5);
        assert_eq!(terms, vec!["scientists", "way", "discover", "new", "planet"]);
    }

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hello 世界";
        let truncated = truncate_to_char_boundary(text, 8);
        assert!(truncated.len() <= 8);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn test_truncate_within_bounds() {
        assert_eq!(truncate_to_char_boundary("Hello", 100), "Hello");
    }
}
