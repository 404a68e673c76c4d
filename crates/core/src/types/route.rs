use serde::{Deserialize, Serialize};

/// Fast-path rule that resolved a message without a model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMode {
    MetaQuestion,
    LocationOnly,
    FoodIntent,
    None,
}

impl HeuristicMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MetaQuestion => "meta_question",
            Self::LocationOnly => "location_only",
            Self::FoodIntent => "food_intent",
            Self::None => "none",
        }
    }
}

/// Final route a request took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterMode {
    Meals,
    NutritionText,
    Clarify,
    DietUnsupported,
    RestaurantNotFound,
    RestaurantAmbiguous,
    RestaurantNoMenuItems,
    Error,
}

impl RouterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meals => "meals",
            Self::NutritionText => "nutrition_text",
            Self::Clarify => "clarify",
            Self::DietUnsupported => "diet_unsupported",
            Self::RestaurantNotFound => "restaurant_not_found",
            Self::RestaurantAmbiguous => "restaurant_ambiguous",
            Self::RestaurantNoMenuItems => "restaurant_no_menu_items",
            Self::Error => "error",
        }
    }
}

/// Observability metadata attached to every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadata {
    pub model_used: bool,
    pub router_mode: RouterMode,
    pub heuristic_mode: HeuristicMode,
}

impl RouteMetadata {
    /// Metadata for a request rejected before routing started.
    pub fn rejected() -> Self {
        Self {
            model_used: false,
            router_mode: RouterMode::Error,
            heuristic_mode: HeuristicMode::None,
        }
    }
}
