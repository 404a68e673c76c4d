use serde::{Deserialize, Serialize};

use super::constraints::Constraints;
use super::intent::FALLBACK_QUERY;
use super::restaurant::RestaurantIdentity;

/// Default number of meals per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default pagination offset.
pub const DEFAULT_OFFSET: usize = 0;

/// Request handed to the search collaborator. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSearchRequest {
    pub query: String,
    pub constraints: Constraints,
    pub restaurant: Option<RestaurantIdentity>,
    pub limit: usize,
    pub offset: usize,
}

/// Partial fields from which a [`NormalizedSearchRequest`] is built.
#[derive(Debug, Clone, Default)]
pub struct SearchFields {
    pub query: String,
    pub constraints: Constraints,
    pub restaurant: Option<RestaurantIdentity>,
    pub page_size: Option<usize>,
}

/// Build the final search request, applying pagination defaults.
///
/// The constraint's restaurant name always mirrors the resolved identity so
/// the two can never disagree.
pub fn build_normalized_search_request(fields: SearchFields) -> NormalizedSearchRequest {
    let query = fields.query.trim();
    let query = if query.is_empty() {
        FALLBACK_QUERY.to_string()
    } else {
        query.to_string()
    };

    let constraints = Constraints {
        restaurant: fields.restaurant.as_ref().map(|r| r.name.clone()),
        ..fields.constraints
    };

    NormalizedSearchRequest {
        query,
        constraints,
        restaurant: fields.restaurant,
        limit: fields
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE),
        offset: DEFAULT_OFFSET,
    }
}

/// Macro nutrients of a menu item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// A meal returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    pub id: String,
    pub name: String,
    pub restaurant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub macros: Macros,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub meals: Vec<MealItem>,
    pub has_more: bool,
    pub next_offset: usize,
    pub search_key: String,
}
