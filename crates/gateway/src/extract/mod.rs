//! Deterministic constraint extraction.
//!
//! Two independent passes live here:
//! - [`RuleBasedExtractor`]: the authoritative pass (ranges, decimals,
//!   both bounds on every axis, validated explicit-restaurant detection).
//! - [`FallbackParser`]: a lighter regex pass that only fills gaps.
//!
//! Both match against the raw message so proper nouns keep their case.

pub mod authoritative;
pub mod fallback;
pub(crate) mod patterns;

pub use authoritative::RuleBasedExtractor;
pub use fallback::{FallbackParser, ParsedConstraints};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords::{
    is_forbidden_token, RESTAURANT_LEADING_ARTICLES, RESTAURANT_TRAILING_WORDS,
};

/// Candidates must be 1 to 49 characters after cleanup.
const MAX_RESTAURANT_LEN: usize = 49;

/// Lead-ins after which a restaurant name may follow.
static FROM_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfrom\s+").unwrap());
static AT_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bat\s+").unwrap());

/// The clause following a lead-in, up to the next delimiter.
static RESTAURANT_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^([\p{L}\p{N}'’&.\-]+(?:\s+[\p{L}\p{N}'’&.\-]+)*?)(?:\s*[,;:!?()]|\.(?:\s|$)|\s+(?:at|from|with|under|below|over|above|for|that|and|or|near|nearby|which|having|less|more|around|within|please|today|tonight|but|so|because|if|in)\b|\s*$)",
    )
    .unwrap()
});

/// `Name menu` / `Name's menu`, proper nouns only.
static MENU_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\p{Lu}[\p{L}\p{N}&\-]*(?:\s+\p{Lu}[\p{L}\p{N}&\-]*)*)(?:'s|’s)?\s+menu\b").unwrap()
});

static TIME_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d+(?::\d{2})?\s*(?:am|pm)?$").unwrap());

/// Which restaurant patterns a pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RestaurantPatterns {
    /// "from X" and "at X".
    LeadIns,
    /// Lead-ins plus "X menu".
    Full,
}

/// Extract a restaurant candidate from raw text.
///
/// Patterns are tried in order; the first one yielding an acceptable
/// candidate wins.
pub(crate) fn restaurant_candidate(text: &str, patterns: RestaurantPatterns) -> Option<String> {
    lead_in_candidate(text, &FROM_LEAD)
        .or_else(|| lead_in_candidate(text, &AT_LEAD))
        .or_else(|| match patterns {
            RestaurantPatterns::Full => menu_candidate(text),
            RestaurantPatterns::LeadIns => None,
        })
}

fn lead_in_candidate(text: &str, lead: &Regex) -> Option<String> {
    lead.find_iter(text).find_map(|m| {
        let rest = &text[m.end()..];
        RESTAURANT_CLAUSE
            .captures(rest)
            .and_then(|caps| caps.get(1))
            .and_then(|clause| clean_candidate(clause.as_str()))
    })
}

fn menu_candidate(text: &str) -> Option<String> {
    MENU_SUFFIX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| clean_candidate(m.as_str()))
}

/// Normalize a raw candidate and reject it when it cannot be a name.
pub(crate) fn clean_candidate(raw: &str) -> Option<String> {
    let mut words: Vec<&str> = raw
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, '.' | ',' | '-' | '\'' | '’')))
        .filter(|w| !w.is_empty())
        .collect();

    while words
        .first()
        .is_some_and(|w| RESTAURANT_LEADING_ARTICLES.contains(&w.to_lowercase().as_str()))
    {
        words.remove(0);
    }
    while words
        .last()
        .is_some_and(|w| RESTAURANT_TRAILING_WORDS.contains(&w.to_lowercase().as_str()))
    {
        words.pop();
    }

    let candidate = words.join(" ");
    if candidate.is_empty() || candidate.chars().count() > MAX_RESTAURANT_LEN {
        return None;
    }
    if TIME_LIKE.is_match(&candidate) || !candidate.chars().any(char::is_alphabetic) {
        return None;
    }
    if candidate_tokens(&candidate).any(is_forbidden_token) {
        return None;
    }
    Some(candidate)
}

/// Whole-word tokens of a candidate, split on anything but letters/digits.
pub(crate) fn candidate_tokens(candidate: &str) -> impl Iterator<Item = &str> {
    candidate
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

/// Parse a strictly positive integer capture.
pub(crate) fn parse_positive_int(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .map(f64::from)
}

/// Parse a strictly positive, finite decimal capture.
pub(crate) fn parse_positive_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}
