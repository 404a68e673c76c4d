//! The request pipeline.
//!
//! Stages run strictly in order: heuristic, optional model classifier,
//! then for meal searches: diet check, extraction, restaurant gate, merge,
//! sanitize, search, shape. Each stage returns a value; nothing is
//! reassigned across stages.

use std::sync::Arc;

use uuid::Uuid;

use mealroute_core::traits::{ConstraintSource, IntentClassifier, MealSearcher, RestaurantResolver};
use mealroute_core::types::{
    build_normalized_search_request, ChatRequest, ExplicitRestaurant, HeuristicMode, Intent,
    NormalizedSearchRequest, RawConstraints, RouteMetadata, RouterMode, SearchFields, SearchPage,
    DEFAULT_PAGE_SIZE, FALLBACK_QUERY,
};
use mealroute_core::Result;
use mealroute_governance::{track_restaurant_violation, track_route};

use crate::classifier::{build_classifier_messages, CLARIFY_QUESTION};
use crate::extract::{FallbackParser, RuleBasedExtractor};
use crate::heuristic::PreRouterHeuristic;
use crate::keywords::{find_diet_keyword, DIET_UNSUPPORTED_ANSWER, LOCATION_NOTICE};
use crate::merger::{ConstraintMerger, MergeInputs};
use crate::resolution::{GateOutcome, RestaurantResolutionGate};
use crate::response::{build_summary, MealsExtras, ResponseShaper, ShapedResponse};
use crate::sanitizer::MessageSanitizer;

/// Default number of history turns forwarded to the classifier.
pub const DEFAULT_MAX_HISTORY: usize = 6;

/// Outcome of the routing stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOutcome {
    pub intent: Intent,
    pub model_used: bool,
    pub heuristic_mode: HeuristicMode,
}

/// Per-request routing context.
#[derive(Debug, Clone, Copy)]
struct RouteContext<'a> {
    trace_id: &'a str,
    message: &'a str,
    model_used: bool,
    heuristic_mode: HeuristicMode,
}

impl RouteContext<'_> {
    fn metadata(&self, router_mode: RouterMode) -> RouteMetadata {
        RouteMetadata {
            model_used: self.model_used,
            router_mode,
            heuristic_mode: self.heuristic_mode,
        }
    }
}

/// Routes chat requests to a meal search or a text answer.
pub struct MealRouter {
    heuristic: PreRouterHeuristic,
    classifier: Option<Arc<dyn IntentClassifier>>,
    extractor: Arc<dyn ConstraintSource>,
    fallback: FallbackParser,
    gate: RestaurantResolutionGate,
    merger: ConstraintMerger,
    sanitizer: MessageSanitizer,
    shaper: ResponseShaper,
    searcher: Arc<dyn MealSearcher>,
    page_size: usize,
    max_history: usize,
}

impl MealRouter {
    /// Create a router without a model classifier; unresolved messages
    /// get a clarification question.
    pub fn new(resolver: Arc<dyn RestaurantResolver>, searcher: Arc<dyn MealSearcher>) -> Self {
        Self {
            heuristic: PreRouterHeuristic::new(),
            classifier: None,
            extractor: Arc::new(RuleBasedExtractor::new()),
            fallback: FallbackParser::new(),
            gate: RestaurantResolutionGate::new(resolver),
            merger: ConstraintMerger::new(),
            sanitizer: MessageSanitizer::new(),
            shaper: ResponseShaper::new(),
            searcher,
            page_size: DEFAULT_PAGE_SIZE,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Replace the authoritative extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn ConstraintSource>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_heuristic(mut self, heuristic: PreRouterHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Handle one chat request. Always produces a response.
    pub async fn handle(&self, request: &ChatRequest) -> ShapedResponse {
        let trace_id = Uuid::new_v4().to_string();

        let Some(message) = request.trimmed_message() else {
            tracing::info!(trace_id = %trace_id, "Rejecting request without a message");
            let shaped = self.shaper.malformed("message is required");
            track_route(&shaped.metadata);
            return shaped;
        };

        tracing::info!(
            trace_id = %trace_id,
            message_len = message.len(),
            "Processing chat request"
        );

        let outcome = self.route(request, message, &trace_id).await;
        let ctx = RouteContext {
            trace_id: &trace_id,
            message,
            model_used: outcome.model_used,
            heuristic_mode: outcome.heuristic_mode,
        };

        let shaped = match outcome.intent {
            Intent::NutritionText { answer } => {
                self.shaper.text(answer, ctx.metadata(RouterMode::NutritionText))
            }
            Intent::Clarify { question } => {
                self.shaper.text(question, ctx.metadata(RouterMode::Clarify))
            }
            Intent::MealSearch { query, constraints } => {
                // Constraints riding on a heuristic intent are empty; only
                // a model reply contributes a precedence tier.
                let model = outcome.model_used.then_some(constraints);
                match self.meal_search(ctx, &query, model.as_ref()).await {
                    Ok(shaped) => shaped,
                    Err(e) => {
                        tracing::error!(trace_id = %trace_id, error = %e, "Meal search pipeline failed");
                        self.shaper
                            .failure(&e, ctx.model_used, ctx.heuristic_mode)
                    }
                }
            }
        };

        tracing::info!(
            trace_id = %trace_id,
            model_used = shaped.metadata.model_used,
            router_mode = shaped.metadata.router_mode.as_str(),
            heuristic_mode = shaped.metadata.heuristic_mode.as_str(),
            status = shaped.status.as_u16(),
            "Request routed"
        );
        track_route(&shaped.metadata);
        shaped
    }

    /// Heuristic first; the classifier only for unresolved messages.
    pub async fn route(&self, request: &ChatRequest, message: &str, trace_id: &str) -> ClassifierOutcome {
        let decision = self.heuristic.classify(message);
        if let Some(intent) = decision.intent {
            tracing::debug!(
                trace_id = %trace_id,
                heuristic_mode = decision.mode.as_str(),
                reason = %decision.reason,
                "Heuristic resolved intent"
            );
            return ClassifierOutcome {
                intent,
                model_used: false,
                heuristic_mode: decision.mode,
            };
        }

        let Some(classifier) = self.classifier.as_ref() else {
            tracing::debug!(trace_id = %trace_id, "No classifier configured, asking to clarify");
            return ClassifierOutcome {
                intent: Intent::clarify(CLARIFY_QUESTION),
                model_used: false,
                heuristic_mode: HeuristicMode::None,
            };
        };

        let messages = build_classifier_messages(request, message, self.max_history);
        let intent = match classifier.classify(&messages).await {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(trace_id = %trace_id, error = %e, "Classifier failed, asking to clarify");
                Intent::clarify(CLARIFY_QUESTION)
            }
        };
        tracing::debug!(trace_id = %trace_id, intent = intent.kind(), "Classifier resolved intent");

        ClassifierOutcome {
            intent,
            model_used: true,
            heuristic_mode: HeuristicMode::None,
        }
    }

    async fn meal_search(
        &self,
        ctx: RouteContext<'_>,
        query: &str,
        model: Option<&RawConstraints>,
    ) -> Result<ShapedResponse> {
        let message = ctx.message;

        if let Some(keyword) = find_diet_keyword(message) {
            tracing::info!(trace_id = %ctx.trace_id, keyword = %keyword, "Diet filter requested");
            return Ok(self
                .shaper
                .text(DIET_UNSUPPORTED_ANSWER, ctx.metadata(RouterMode::DietUnsupported)));
        }

        let authoritative = match self.extractor.extract_constraints(message) {
            Ok(constraints) => Some(constraints),
            Err(e) => {
                tracing::warn!(trace_id = %ctx.trace_id, error = %e, "Authoritative extractor unavailable, using fallback parser");
                None
            }
        };
        let explicit = match self.extractor.detect_explicit_restaurant(message) {
            Ok(explicit) => explicit,
            Err(e) => {
                tracing::warn!(trace_id = %ctx.trace_id, error = %e, "Explicit restaurant detection unavailable");
                ExplicitRestaurant::none()
            }
        };
        let fallback = self.fallback.parse(message);

        let resolution = match self
            .gate
            .run(message, &explicit, fallback.restaurant_phrase.as_deref())
            .await?
        {
            GateOutcome::Continue(resolution) => resolution,
            GateOutcome::ShortCircuit(reply) => {
                tracing::info!(
                    trace_id = %ctx.trace_id,
                    router_mode = reply.router_mode.as_str(),
                    "Restaurant gate answered early"
                );
                return Ok(self.shaper.text(reply.message, ctx.metadata(reply.router_mode)));
            }
        };

        let merged = self.merger.merge(MergeInputs {
            message,
            authoritative: authoritative.as_ref(),
            model,
            fallback: &fallback.constraints,
            explicit: &explicit,
            resolution: &resolution,
        });

        let search_query = if resolution.restaurant_only && merged.restaurant.is_some() {
            FALLBACK_QUERY.to_string()
        } else {
            self.sanitizer.sanitize_query(query)
        };

        let request = build_normalized_search_request(SearchFields {
            query: search_query,
            constraints: merged.constraints,
            restaurant: merged.restaurant,
            page_size: Some(self.page_size),
        });
        tracing::debug!(
            trace_id = %ctx.trace_id,
            query = %request.query,
            restaurant = ?request.restaurant.as_ref().map(|r| r.name.as_str()),
            restaurant_dropped = merged.restaurant_dropped,
            "Executing search"
        );

        let page = self.searcher.execute_search(&request).await?;

        let violations = audit_restaurant_invariant(&request, &page);
        if violations > 0 {
            tracing::error!(
                trace_id = %ctx.trace_id,
                violations,
                "Search returned meals outside the enforced restaurant"
            );
            track_restaurant_violation(violations as u64);
        }

        let restaurant = request.restaurant.as_ref().map(|r| r.name.clone());
        let extras = MealsExtras {
            summary: Some(build_summary(&page, &request.constraints, restaurant.as_deref())),
            message: self
                .sanitizer
                .has_location_intent(message)
                .then(|| LOCATION_NOTICE.to_string()),
            restaurant,
        };
        Ok(self.shaper.meals(page, extras, ctx.metadata(RouterMode::Meals)))
    }
}

/// Number of meals that do not belong to the restaurant the request was
/// scoped to. Zero when the request was not scoped.
pub fn audit_restaurant_invariant(request: &NormalizedSearchRequest, page: &SearchPage) -> usize {
    match request.restaurant.as_ref() {
        Some(identity) => page
            .meals
            .iter()
            .filter(|meal| !identity.matches(&meal.restaurant))
            .count(),
        None => 0,
    }
}
