//! Search-text sanitizer.
//!
//! Strips location and filler phrases from the text that becomes the
//! literal search query. Meal-time words are kept: removing them leaves
//! residue like "find me" that reads as a restaurant-only query.

use once_cell::sync::Lazy;
use regex::Regex;

use mealroute_core::types::FALLBACK_QUERY;

use crate::keywords::{LOCATION_FILLER_PATTERNS, SEARCH_FILLER_PATTERNS};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
        .collect()
}

static LOCATION: Lazy<Vec<Regex>> = Lazy::new(|| compile(LOCATION_FILLER_PATTERNS));
static FILLER: Lazy<Vec<Regex>> = Lazy::new(|| compile(SEARCH_FILLER_PATTERNS));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.!?;:])").unwrap());
static REPEATED_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?:\s*,)+").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageSanitizer;

impl MessageSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Remove filler phrases and tidy whitespace. May return an empty string.
    pub fn sanitize(&self, text: &str) -> String {
        let mut current = text.to_string();
        // Removing one phrase can join the halves of another.
        loop {
            let mut next = current.clone();
            for re in LOCATION.iter().chain(FILLER.iter()) {
                next = re.replace_all(&next, " ").into_owned();
            }
            next = tidy(&next);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    /// Like [`MessageSanitizer::sanitize`] but never empty.
    pub fn sanitize_query(&self, text: &str) -> String {
        let cleaned = self.sanitize(text);
        if cleaned.is_empty() {
            FALLBACK_QUERY.to_string()
        } else {
            cleaned
        }
    }

    /// Whether `text` carries any location phrase.
    pub fn has_location_intent(&self, text: &str) -> bool {
        LOCATION.iter().any(|re| re.is_match(text))
    }
}

fn tidy(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = REPEATED_COMMAS.replace_all(&text, ",");
    text.trim_matches(|c: char| c.is_whitespace() || c == ',')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_location_phrases() {
        let sanitizer = MessageSanitizer::new();
        assert_eq!(sanitizer.sanitize("burrito bowl near me"), "burrito bowl");
        assert_eq!(
            sanitizer.sanitize("salad within 5 miles, under 600 calories"),
            "salad, under 600 calories"
        );
        assert_eq!(sanitizer.sanitize("closest pizza please"), "pizza");
        assert_eq!(sanitizer.sanitize("local   sushi nearby"), "sushi");
    }

    #[test]
    fn test_keeps_meal_time_words() {
        let sanitizer = MessageSanitizer::new();
        assert_eq!(sanitizer.sanitize("find me lunch near me"), "find me lunch");
        assert_eq!(sanitizer.sanitize("Breakfast nearby"), "Breakfast");
    }

    #[test]
    fn test_empty_result_falls_back() {
        let sanitizer = MessageSanitizer::new();
        assert_eq!(sanitizer.sanitize("near me"), "");
        assert_eq!(sanitizer.sanitize_query("near me"), FALLBACK_QUERY);
        assert_eq!(sanitizer.sanitize_query("within 10 miles"), FALLBACK_QUERY);
    }

    #[test]
    fn test_idempotent() {
        let sanitizer = MessageSanitizer::new();
        for text in [
            "burrito bowl near me",
            "pizza , nearby , please",
            "near near me me",
            "chicken within 2 km of me right now",
            "  plain text  ",
        ] {
            let once = sanitizer.sanitize(text);
            assert_eq!(sanitizer.sanitize(&once), once, "{text}");
        }
    }

    #[test]
    fn test_location_intent() {
        let sanitizer = MessageSanitizer::new();
        assert!(sanitizer.has_location_intent("tacos near me"));
        assert!(sanitizer.has_location_intent("within 3 miles"));
        assert!(!sanitizer.has_location_intent("tacos please"));
    }
}
