//! Restaurant resolution gate.
//!
//! The resolver is fuzzy and costly, so it only runs when deterministic
//! detection found an explicit restaurant. Its status decides whether the
//! pipeline continues or answers early.

use std::sync::Arc;

use mealroute_core::traits::RestaurantResolver;
use mealroute_core::types::{ExplicitRestaurant, RestaurantMatch, RouterMode};
use mealroute_core::Result;

/// Candidates listed in a disambiguation prompt.
pub const MAX_AMBIGUOUS_CANDIDATES: usize = 5;

/// What the rest of the pipeline needs from a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantResolution {
    pub restaurant_match: RestaurantMatch,
    /// The message names the restaurant and nothing else worth searching.
    pub restaurant_only: bool,
}

impl RestaurantResolution {
    fn no_intent() -> Self {
        Self {
            restaurant_match: RestaurantMatch::NoRestaurantIntent,
            restaurant_only: false,
        }
    }
}

/// An early answer produced instead of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReply {
    pub router_mode: RouterMode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Continue(RestaurantResolution),
    ShortCircuit(GateReply),
}

/// Gate around a [`RestaurantResolver`].
pub struct RestaurantResolutionGate {
    resolver: Arc<dyn RestaurantResolver>,
}

impl RestaurantResolutionGate {
    pub fn new(resolver: Arc<dyn RestaurantResolver>) -> Self {
        Self { resolver }
    }

    /// Run the gate.
    ///
    /// `fallback_phrase` is the lighter parser's restaurant phrase, used
    /// only to word the not-found apology.
    pub async fn run(
        &self,
        message: &str,
        explicit: &ExplicitRestaurant,
        fallback_phrase: Option<&str>,
    ) -> Result<GateOutcome> {
        if !explicit.has_restaurant {
            return Ok(GateOutcome::Continue(RestaurantResolution::no_intent()));
        }

        let query = explicit
            .restaurant_query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(message);
        let restaurant_match = self.resolver.resolve_restaurant(query).await?;

        tracing::debug!(
            query = %query,
            status = restaurant_match.status(),
            "Restaurant resolved"
        );

        match restaurant_match {
            RestaurantMatch::Match { .. } => {
                let restaurant_only = self.resolver.is_restaurant_only_query(message, true).await?;
                Ok(GateOutcome::Continue(RestaurantResolution {
                    restaurant_match,
                    restaurant_only,
                }))
            }
            RestaurantMatch::NotFound { query_text } => {
                let phrase = explicit
                    .restaurant_query
                    .as_deref()
                    .or(query_text.as_deref())
                    .or(fallback_phrase)
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or("that restaurant");
                Ok(GateOutcome::ShortCircuit(GateReply {
                    router_mode: RouterMode::RestaurantNotFound,
                    message: format!(
                        "Sorry, I couldn't find a restaurant called \"{}\". Check the spelling or try another restaurant.",
                        phrase
                    ),
                }))
            }
            RestaurantMatch::Ambiguous { candidates } => {
                let names: Vec<&str> = candidates
                    .iter()
                    .take(MAX_AMBIGUOUS_CANDIDATES)
                    .map(|c| c.name.as_str())
                    .collect();
                Ok(GateOutcome::ShortCircuit(GateReply {
                    router_mode: RouterMode::RestaurantAmbiguous,
                    message: format!(
                        "I found a few restaurants that could match. Did you mean: {}?",
                        names.join(", ")
                    ),
                }))
            }
            RestaurantMatch::NoMenuItems { canonical_name } => {
                Ok(GateOutcome::ShortCircuit(GateReply {
                    router_mode: RouterMode::RestaurantNoMenuItems,
                    message: format!(
                        "{} is in our catalog, but it has no menu items with nutrition data yet.",
                        canonical_name
                    ),
                }))
            }
            RestaurantMatch::NoRestaurantIntent => {
                tracing::warn!(query = %query, "Resolver reported no restaurant intent for an explicit restaurant");
                Ok(GateOutcome::Continue(RestaurantResolution::no_intent()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealroute_core::mocks::MockResolver;
    use mealroute_core::types::RestaurantCandidate;
    use mealroute_core::Error;

    fn reply(outcome: GateOutcome) -> GateReply {
        match outcome {
            GateOutcome::ShortCircuit(reply) => reply,
            other => panic!("Expected ShortCircuit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_explicit_restaurant_skips_resolver() {
        let resolver = Arc::new(MockResolver::matching("Chipotle"));
        let gate = RestaurantResolutionGate::new(resolver.clone());

        let outcome = gate
            .run("burger", &ExplicitRestaurant::none(), None)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            GateOutcome::Continue(RestaurantResolution::no_intent())
        );
        assert_eq!(resolver.resolve_calls(), 0);
        assert_eq!(resolver.restaurant_only_calls(), 0);
    }

    #[tokio::test]
    async fn test_match_checks_restaurant_only() {
        let resolver = Arc::new(MockResolver::matching("Chipotle").restaurant_only(true));
        let gate = RestaurantResolutionGate::new(resolver.clone());

        let outcome = gate
            .run("from Chipotle", &ExplicitRestaurant::detected("Chipotle"), None)
            .await
            .unwrap();

        match outcome {
            GateOutcome::Continue(resolution) => {
                assert!(resolution.restaurant_only);
                assert_eq!(resolution.restaurant_match.status(), "match");
            }
            other => panic!("Expected Continue, got {:?}", other),
        }
        assert_eq!(resolver.resolve_calls(), 1);
        assert_eq!(resolver.restaurant_only_calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_names_phrase() {
        let resolver = Arc::new(MockResolver::new(RestaurantMatch::NotFound { query_text: None }));
        let gate = RestaurantResolutionGate::new(resolver);

        let reply = reply(
            gate.run("lunch from Chipotel", &ExplicitRestaurant::detected("Chipotel"), None)
                .await
                .unwrap(),
        );
        assert_eq!(reply.router_mode, RouterMode::RestaurantNotFound);
        assert!(reply.message.contains("\"Chipotel\""));
    }

    #[tokio::test]
    async fn test_ambiguous_lists_five_in_order() {
        let candidates = (1..=7)
            .map(|i| RestaurantCandidate {
                name: format!("Grill {}", i),
                score: 1.0 - i as f64 / 10.0,
            })
            .collect();
        let resolver = Arc::new(MockResolver::new(RestaurantMatch::Ambiguous { candidates }));
        let gate = RestaurantResolutionGate::new(resolver);

        let reply = reply(
            gate.run("from grill", &ExplicitRestaurant::detected("grill"), None)
                .await
                .unwrap(),
        );
        assert_eq!(reply.router_mode, RouterMode::RestaurantAmbiguous);
        assert!(reply
            .message
            .contains("Grill 1, Grill 2, Grill 3, Grill 4, Grill 5?"));
        assert!(!reply.message.contains("Grill 6"));
    }

    #[tokio::test]
    async fn test_no_menu_items() {
        let resolver = Arc::new(MockResolver::new(RestaurantMatch::NoMenuItems {
            canonical_name: "Tiny Cafe".into(),
        }));
        let gate = RestaurantResolutionGate::new(resolver);

        let reply = reply(
            gate.run("at Tiny Cafe", &ExplicitRestaurant::detected("Tiny Cafe"), None)
                .await
                .unwrap(),
        );
        assert_eq!(reply.router_mode, RouterMode::RestaurantNoMenuItems);
        assert!(reply.message.starts_with("Tiny Cafe"));
    }

    #[tokio::test]
    async fn test_no_intent_status_is_tolerated() {
        let resolver = Arc::new(MockResolver::new(RestaurantMatch::NoRestaurantIntent));
        let gate = RestaurantResolutionGate::new(resolver.clone());

        let outcome = gate
            .run("from Somewhere Odd", &ExplicitRestaurant::detected("Somewhere Odd"), None)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            GateOutcome::Continue(RestaurantResolution::no_intent())
        );
        assert_eq!(resolver.restaurant_only_calls(), 0);
    }

    #[tokio::test]
    async fn test_resolver_failure_propagates() {
        let gate = RestaurantResolutionGate::new(Arc::new(MockResolver::failing()));
        let err = gate
            .run("from Chipotle", &ExplicitRestaurant::detected("Chipotle"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Resolver(_)));
    }
}
