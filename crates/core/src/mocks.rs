//! Mock implementations of core traits for testing.
//!
//! Every mock counts its calls so tests can assert which collaborators a
//! request touched.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{
    traits::{
        ChatMessage, ConstraintSource, IntentClassifier, LlmClient, LlmResponse, LlmUsage,
        MealSearcher, RestaurantResolver,
    },
    types::{
        Constraints, ExplicitRestaurant, Intent, MatchType, MealItem, NormalizedSearchRequest,
        RestaurantMatch, SearchPage,
    },
    Error, Result,
};

// =============================================================================
// Mock LLM Client
// =============================================================================

/// Scripted mock LLM that returns predefined responses in rotation.
pub struct MockLlm {
    responses: Vec<String>,
    call_count: AtomicUsize,
}

impl MockLlm {
    /// Create a new mock LLM with a queue of responses.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Get the number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, _prompt: &str) -> Result<LlmResponse> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        let idx = count % self.responses.len().max(1);
        let content = self.responses.get(idx).cloned().unwrap_or_default();

        Ok(LlmResponse {
            content,
            finish_reason: "stop".to_string(),
            usage: LlmUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            },
        })
    }

    async fn chat(&self, _messages: &[ChatMessage]) -> Result<LlmResponse> {
        self.complete("").await
    }
}

// =============================================================================
// Mock Classifier
// =============================================================================

/// Classifier returning a fixed intent, or failing.
pub struct MockClassifier {
    intent: Option<Intent>,
    call_count: AtomicUsize,
}

impl MockClassifier {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent: Some(intent),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A classifier whose every call fails.
    pub fn failing() -> Self {
        Self {
            intent: None,
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(&self, _messages: &[ChatMessage]) -> Result<Intent> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.intent
            .clone()
            .ok_or_else(|| Error::classifier("mock classifier failure"))
    }
}

// =============================================================================
// Mock Restaurant Resolver
// =============================================================================

/// Resolver returning a fixed match.
pub struct MockResolver {
    result: Option<RestaurantMatch>,
    restaurant_only: bool,
    resolve_calls: AtomicUsize,
    restaurant_only_calls: AtomicUsize,
}

impl MockResolver {
    pub fn new(result: RestaurantMatch) -> Self {
        Self {
            result: Some(result),
            restaurant_only: false,
            resolve_calls: AtomicUsize::new(0),
            restaurant_only_calls: AtomicUsize::new(0),
        }
    }

    /// A resolver that matches `name` exactly.
    pub fn matching(name: &str) -> Self {
        Self::new(RestaurantMatch::Match {
            canonical_name: name.to_string(),
            id: Some(format!("rest-{}", name.to_lowercase().replace(' ', "-"))),
            variants: vec![name.to_string()],
            match_type: MatchType::Exact,
        })
    }

    /// A resolver whose every call fails.
    pub fn failing() -> Self {
        Self {
            result: None,
            ..Self::new(RestaurantMatch::NoRestaurantIntent)
        }
    }

    /// Report every query as restaurant-only.
    pub fn restaurant_only(mut self, value: bool) -> Self {
        self.restaurant_only = value;
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn restaurant_only_calls(&self) -> usize {
        self.restaurant_only_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RestaurantResolver for MockResolver {
    async fn resolve_restaurant(&self, _text: &str) -> Result<RestaurantMatch> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| Error::resolver("mock resolver failure"))
    }

    async fn is_restaurant_only_query(&self, _text: &str, matched: bool) -> Result<bool> {
        self.restaurant_only_calls.fetch_add(1, Ordering::SeqCst);
        Ok(matched && self.restaurant_only)
    }
}

// =============================================================================
// Mock Searcher
// =============================================================================

/// Searcher returning fixed meals and recording the last request.
pub struct MockSearcher {
    meals: Option<Vec<MealItem>>,
    last_request: Mutex<Option<NormalizedSearchRequest>>,
    call_count: AtomicUsize,
}

impl MockSearcher {
    pub fn new(meals: Vec<MealItem>) -> Self {
        Self {
            meals: Some(meals),
            last_request: Mutex::new(None),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A searcher whose every call fails.
    pub fn failing() -> Self {
        Self {
            meals: None,
            ..Self::new(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The request passed to the most recent search.
    pub fn last_request(&self) -> Option<NormalizedSearchRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl MealSearcher for MockSearcher {
    async fn execute_search(&self, request: &NormalizedSearchRequest) -> Result<SearchPage> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        let meals = self
            .meals
            .clone()
            .ok_or_else(|| Error::search("mock search failure"))?;
        let page: Vec<MealItem> = meals
            .iter()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect();
        let next_offset = request.offset + page.len();

        Ok(SearchPage {
            has_more: next_offset < meals.len(),
            next_offset,
            search_key: "mock-search-key".to_string(),
            meals: page,
        })
    }
}

// =============================================================================
// Mock Constraint Source
// =============================================================================

/// Constraint source returning fixed answers, or unavailable.
pub struct MockConstraintSource {
    constraints: Option<Constraints>,
    restaurant: ExplicitRestaurant,
}

impl MockConstraintSource {
    pub fn new(constraints: Constraints, restaurant: ExplicitRestaurant) -> Self {
        Self {
            constraints: Some(constraints),
            restaurant,
        }
    }

    /// A source that reports itself unavailable.
    pub fn unavailable() -> Self {
        Self {
            constraints: None,
            restaurant: ExplicitRestaurant::none(),
        }
    }
}

impl ConstraintSource for MockConstraintSource {
    fn extract_constraints(&self, _text: &str) -> Result<Constraints> {
        self.constraints
            .clone()
            .ok_or_else(|| Error::extraction("mock extractor unavailable"))
    }

    fn detect_explicit_restaurant(&self, _text: &str) -> Result<ExplicitRestaurant> {
        if self.constraints.is_none() {
            return Err(Error::extraction("mock extractor unavailable"));
        }
        Ok(self.restaurant.clone())
    }
}
