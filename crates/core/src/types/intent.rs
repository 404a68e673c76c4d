use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::constraints::RawConstraints;

/// Query used whenever the literal search text is empty or must not
/// over-constrain a restaurant-scoped search.
pub const FALLBACK_QUERY: &str = "healthy meal";

// =============================================================================
// Intent Types (Router Output)
// =============================================================================

/// The response mode chosen for a request. Exactly one case is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "payload")]
pub enum Intent {
    /// Structured meal search.
    #[serde(rename = "meal_search")]
    MealSearch {
        /// Literal search text. Never empty.
        query: String,
        /// Constraints proposed by whoever produced the intent.
        #[serde(default)]
        constraints: RawConstraints,
    },

    /// Canned nutrition or app answer.
    #[serde(rename = "nutrition_text")]
    NutritionText {
        /// Answer shown to the user.
        answer: String,
    },

    /// The message could not be routed; ask the user to clarify.
    #[serde(rename = "clarify")]
    Clarify {
        /// Clarification question.
        question: String,
    },
}

impl Intent {
    /// Build a meal search intent, substituting [`FALLBACK_QUERY`] for a
    /// blank query.
    pub fn meal_search(query: impl Into<String>, constraints: RawConstraints) -> Self {
        let query = query.into();
        let query = if query.trim().is_empty() {
            FALLBACK_QUERY.to_string()
        } else {
            query
        };
        Self::MealSearch { query, constraints }
    }

    /// Build a nutrition text intent.
    pub fn nutrition_text(answer: impl Into<String>) -> Self {
        Self::NutritionText {
            answer: answer.into(),
        }
    }

    /// Build a clarification intent.
    pub fn clarify(question: impl Into<String>) -> Self {
        Self::Clarify {
            question: question.into(),
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MealSearch { .. } => "meal_search",
            Self::NutritionText { .. } => "nutrition_text",
            Self::Clarify { .. } => "clarify",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_falls_back() {
        match Intent::meal_search("   ", RawConstraints::default()) {
            Intent::MealSearch { query, .. } => assert_eq!(query, FALLBACK_QUERY),
            other => panic!("Expected MealSearch, got {:?}", other),
        }
    }

    #[test]
    fn test_serialized_tag() {
        let intent = Intent::clarify("What are you hungry for?");
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "clarify");
        assert_eq!(json["payload"]["question"], "What are you hungry for?");
    }
}
