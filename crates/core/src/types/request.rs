use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types
// =============================================================================

/// Incoming chat request body.
///
/// `message` is optional at the serde level so a missing message is
/// reported through the uniform error envelope instead of a bare rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_context: Option<serde_json::Value>,
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

impl ChatRequest {
    /// Create a request carrying only a message.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attach a history turn.
    pub fn with_history(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.history.push(HistoryMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// The trimmed message, or `None` when missing or blank.
    pub fn trimmed_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// A prior conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}
