use serde::{Deserialize, Serialize};

use super::search::MealItem;

/// Uniform response envelope, discriminated by `mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Meals(MealsPayload),
    Text(TextPayload),
}

/// Payload of a meal-search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealsPayload {
    pub meals: Vec<MealItem>,
    pub has_more: bool,
    pub next_offset: usize,
    pub search_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
}

/// Payload of a text or error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    pub error: bool,
    pub message: String,
    pub answer: String,
}

impl ResponseEnvelope {
    /// Whether this is an error envelope.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Text(TextPayload { error: true, .. }))
    }

    /// The `mode` discriminator.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Meals(_) => "meals",
            Self::Text(_) => "text",
        }
    }
}
