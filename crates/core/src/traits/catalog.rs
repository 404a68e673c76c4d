//! Catalog collaborator traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NormalizedSearchRequest, RestaurantMatch, SearchPage};

/// Resolves free-text restaurant phrases against the catalog.
#[async_trait]
pub trait RestaurantResolver: Send + Sync {
    /// Resolve the restaurant mentioned in `text`.
    async fn resolve_restaurant(&self, text: &str) -> Result<RestaurantMatch>;

    /// Whether `text` names a restaurant and nothing else worth searching
    /// for (no dish and no macro content).
    async fn is_restaurant_only_query(&self, text: &str, matched: bool) -> Result<bool>;
}

/// Executes a normalized meal search.
#[async_trait]
pub trait MealSearcher: Send + Sync {
    async fn execute_search(&self, request: &NormalizedSearchRequest) -> Result<SearchPage>;
}
