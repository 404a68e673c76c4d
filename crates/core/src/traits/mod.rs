//! Collaborator traits for Mealroute.
//!
//! Traits are organized by the seam they cover:
//! - `classifier`: the model-backed intent classifier
//! - `catalog`: restaurant resolution and meal search
//! - `extractor`: the authoritative constraint extractor
//! - `llm`: the raw LLM client the classifier is built on

pub mod catalog;
pub mod classifier;
pub mod extractor;
pub mod llm;

pub use catalog::*;
pub use classifier::*;
pub use extractor::*;
pub use llm::*;
