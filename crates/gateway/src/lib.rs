#![deny(unused)]
//! HTTP gateway and routing pipeline for Mealroute.
//!
//! This crate turns a free-text meal request into either a normalized
//! meal search or a text answer:
//! - `heuristic`: keyword pre-router that avoids most model calls
//! - `extract`: deterministic constraint and restaurant extraction
//! - `resolution`: the restaurant resolution gate
//! - `merger` / `sanitizer` / `response`: merge, clean, and shape
//! - `pipeline`: the stages wired in order
//! - `catalog`: in-memory resolver and search backend
//! - `server`: the axum HTTP surface

pub mod catalog;
pub mod classifier;
pub mod extract;
pub mod heuristic;
pub mod keywords;
pub mod merger;
pub mod pipeline;
pub mod resolution;
pub mod response;
pub mod sanitizer;
pub mod server;

pub use catalog::InMemoryCatalog;
pub use classifier::LlmIntentClassifier;
pub use extract::{FallbackParser, RuleBasedExtractor};
pub use heuristic::{HeuristicDecision, PreRouterHeuristic};
pub use merger::{ConstraintMerger, MergedConstraints};
pub use pipeline::{ClassifierOutcome, MealRouter};
pub use resolution::{GateOutcome, RestaurantResolutionGate};
pub use response::{ResponseShaper, ShapedResponse};
pub use sanitizer::MessageSanitizer;
pub use server::{GatewayConfig, GatewayServer};
