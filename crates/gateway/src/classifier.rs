//! Model-backed intent classifier.
//!
//! Invoked only when the heuristic could not resolve a message. The model
//! is asked for a JSON document matching the [`Intent`] schema; anything
//! else is a classifier failure.

use std::sync::Arc;

use async_trait::async_trait;

use mealroute_core::traits::{ChatMessage, IntentClassifier, LlmClient};
use mealroute_core::types::{ChatRequest, Intent};
use mealroute_core::{Error, Result};

const SYSTEM_PROMPT: &str = "You route messages for a meal search assistant. \
Reply with a single JSON object and nothing else. \
Use type \"meal_search\" when the user wants food suggestions, with the search text as \"query\" \
and any calorie or macro bounds they stated under \"constraints\". \
Use type \"nutrition_text\" for general nutrition questions, with a short \"answer\". \
Use type \"clarify\" when you cannot tell, with a short \"question\". \
The reply must validate against this JSON schema:";

/// Clarification question used when the classifier fails.
pub const CLARIFY_QUESTION: &str = "I'm not sure what you're looking for. Could you tell me what \
kind of meal you want, and any calorie or protein goals?";

/// Build the message list for the classifier: optional user context, the
/// most recent `max_history` turns, then the message itself.
pub fn build_classifier_messages(
    request: &ChatRequest,
    message: &str,
    max_history: usize,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(max_history + 2);
    if let Some(context) = request.user_context.as_ref().filter(|c| !c.is_null()) {
        messages.push(ChatMessage::system(format!("User context: {}", context)));
    }
    let skip = request.history.len().saturating_sub(max_history);
    for turn in request.history.iter().skip(skip) {
        let message = match turn.role.as_str() {
            "assistant" => ChatMessage::assistant(turn.content.clone()),
            _ => ChatMessage::user(turn.content.clone()),
        };
        messages.push(message);
    }
    messages.push(ChatMessage::user(message));
    messages
}

/// [`IntentClassifier`] backed by any [`LlmClient`].
pub struct LlmIntentClassifier {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl LlmIntentClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Result<Self> {
        let schema = serde_json::to_string(&schemars::schema_for!(Intent))?;
        Ok(Self {
            llm,
            system_prompt: format!("{}\n{}", SYSTEM_PROMPT, schema),
        })
    }

    /// Parse a model reply into an intent.
    ///
    /// Code fences and surrounding prose are tolerated; the JSON object
    /// itself must validate.
    pub fn parse_reply(content: &str) -> Result<Intent> {
        let start = content.find('{');
        let end = content.rfind('}');
        let json = match (start, end) {
            (Some(start), Some(end)) if start < end => &content[start..=end],
            _ => return Err(Error::classifier("model reply contains no JSON object")),
        };

        let intent: Intent = serde_json::from_str(json)
            .map_err(|e| Error::classifier(format!("model reply does not match schema: {}", e)))?;

        match intent {
            Intent::MealSearch { query, constraints } => Ok(Intent::meal_search(query, constraints)),
            Intent::NutritionText { answer } if answer.trim().is_empty() => {
                Err(Error::classifier("empty nutrition answer"))
            }
            Intent::Clarify { question } if question.trim().is_empty() => {
                Err(Error::classifier("empty clarification question"))
            }
            other => Ok(other),
        }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(&self, messages: &[ChatMessage]) -> Result<Intent> {
        let mut prompt = Vec::with_capacity(messages.len() + 1);
        prompt.push(ChatMessage::system(self.system_prompt.clone()));
        prompt.extend_from_slice(messages);

        let response = self
            .llm
            .chat(&prompt)
            .await
            .map_err(|e| Error::classifier(format!("model call failed: {}", e)))?;

        tracing::debug!(
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Classifier reply received"
        );

        Self::parse_reply(&response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealroute_core::mocks::MockLlm;
    use mealroute_core::types::{NumericValue, FALLBACK_QUERY};

    #[tokio::test]
    async fn test_meal_search_reply() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"```json
{"type": "meal_search", "payload": {"query": "grilled chicken", "constraints": {"calorieCap": "650"}}}
```"#
                .to_string(),
        ]));
        let classifier = LlmIntentClassifier::new(llm).unwrap();
        let intent = classifier
            .classify(&[ChatMessage::user("something light")])
            .await
            .unwrap();

        match intent {
            Intent::MealSearch { query, constraints } => {
                assert_eq!(query, "grilled chicken");
                assert_eq!(constraints.calorie_cap, Some(NumericValue::from("650")));
            }
            other => panic!("Expected MealSearch, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_query_falls_back() {
        let intent = LlmIntentClassifier::parse_reply(
            r#"{"type": "meal_search", "payload": {"query": "  "}}"#,
        )
        .unwrap();
        assert_eq!(
            intent,
            Intent::MealSearch {
                query: FALLBACK_QUERY.to_string(),
                constraints: Default::default(),
            }
        );
    }

    #[test]
    fn test_invalid_replies() {
        for reply in [
            "I think they want lunch",
            r#"{"type": "order_pizza", "payload": {}}"#,
            r#"{"type": "clarify", "payload": {"question": ""}}"#,
            r#"{"type": "nutrition_text"}"#,
        ] {
            let err = LlmIntentClassifier::parse_reply(reply).unwrap_err();
            assert!(matches!(err, Error::Classifier(_)), "{reply}");
            assert!(err.is_recoverable());
        }
    }

    #[test]
    fn test_build_messages_keeps_recent_history() {
        let request = ChatRequest {
            message: Some("and dessert?".into()),
            user_context: Some(serde_json::json!({"goal": "cut"})),
            ..ChatRequest::default()
        }
        .with_history("user", "one")
        .with_history("assistant", "two")
        .with_history("user", "three");

        let messages = build_classifier_messages(&request, "and dessert?", 2);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("cut"));
        assert_eq!(messages[1], ChatMessage::assistant("two"));
        assert_eq!(messages[2], ChatMessage::user("three"));
        assert_eq!(messages[3], ChatMessage::user("and dessert?"));
    }
}
