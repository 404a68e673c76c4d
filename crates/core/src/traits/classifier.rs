//! Model classifier trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::llm::ChatMessage;
use crate::types::Intent;

/// Slow-path intent classifier, invoked only for messages the heuristic
/// could not resolve.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify a conversation whose last message is the user's request.
    ///
    /// A schema-invalid model reply is an error, never a partial intent.
    async fn classify(&self, messages: &[ChatMessage]) -> Result<Intent>;
}
