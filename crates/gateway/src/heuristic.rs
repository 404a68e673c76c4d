//! Pre-router heuristic.
//!
//! Resolves messages whose intent is obvious from keyword tables so the
//! model classifier is only paid for when the text is genuinely ambiguous.

use mealroute_core::types::{HeuristicMode, Intent, RawConstraints};

use crate::keywords::{contains_phrase, find_food_term, find_meta_phrase, is_location_only, META_ANSWER};

/// Result of the heuristic pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicDecision {
    /// Set when a rule fired.
    pub intent: Option<Intent>,
    /// The rule that fired, or [`HeuristicMode::None`].
    pub mode: HeuristicMode,
    /// Human-readable reason, for logs.
    pub reason: String,
}

impl HeuristicDecision {
    fn resolved(intent: Intent, mode: HeuristicMode, reason: String) -> Self {
        Self {
            intent: Some(intent),
            mode,
            reason,
        }
    }

    fn unresolved() -> Self {
        Self {
            intent: None,
            mode: HeuristicMode::None,
            reason: "no heuristic matched".to_string(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.intent.is_some()
    }
}

/// Keyword-based pre-classifier.
///
/// Checks run in a fixed order and the first match wins:
/// meta question, location only, food intent.
pub struct PreRouterHeuristic {
    /// Extra meta-question phrases.
    meta_phrases: Vec<String>,
    /// Extra food-intent terms.
    food_terms: Vec<String>,
}

impl PreRouterHeuristic {
    pub fn new() -> Self {
        Self {
            meta_phrases: Vec::new(),
            food_terms: Vec::new(),
        }
    }

    /// Add a custom meta-question phrase.
    pub fn with_meta_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.meta_phrases.push(phrase.into().to_lowercase());
        self
    }

    /// Add a custom food-intent term.
    pub fn with_food_term(mut self, term: impl Into<String>) -> Self {
        self.food_terms.push(term.into().to_lowercase());
        self
    }

    fn meta_phrase(&self, message: &str) -> Option<String> {
        self.meta_phrases
            .iter()
            .find(|p| contains_phrase(message, p))
            .cloned()
            .or_else(|| find_meta_phrase(message).map(str::to_string))
    }

    fn food_term(&self, message: &str) -> Option<String> {
        self.food_terms
            .iter()
            .find(|t| contains_phrase(message, t))
            .cloned()
            .or_else(|| find_food_term(message).map(str::to_string))
    }

    pub fn classify(&self, message: &str) -> HeuristicDecision {
        let message = message.trim();

        if let Some(phrase) = self.meta_phrase(message) {
            tracing::debug!(phrase = %phrase, "Heuristic matched meta question");
            return HeuristicDecision::resolved(
                Intent::nutrition_text(META_ANSWER),
                HeuristicMode::MetaQuestion,
                format!("meta phrase '{}'", phrase),
            );
        }

        if is_location_only(message) {
            tracing::debug!("Heuristic matched location-only message");
            return HeuristicDecision::resolved(
                Intent::meal_search(message, RawConstraints::default()),
                HeuristicMode::LocationOnly,
                "whole message is a location phrase".to_string(),
            );
        }

        if let Some(term) = self.food_term(message) {
            tracing::debug!(term = %term, "Heuristic matched food intent");
            return HeuristicDecision::resolved(
                Intent::meal_search(message, RawConstraints::default()),
                HeuristicMode::FoodIntent,
                format!("food term '{}'", term),
            );
        }

        HeuristicDecision::unresolved()
    }
}

impl Default for PreRouterHeuristic {
    fn default() -> Self {
        Self::new()
    }
}
