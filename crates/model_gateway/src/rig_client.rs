//! Rig LLM client adapter.
//!
//! Wraps Rig's Agent for integration with our LlmClient trait.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use mealroute_core::{
    traits::{ChatMessage, LlmClient, LlmResponse, LlmUsage},
    Error, Result,
};

use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;

/// Sampling temperature for every call.
const ROUTING_TEMPERATURE: f64 = 0.0;

/// Provider type for Rig clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigProvider {
    OpenAI,
    Anthropic,
}

impl RigProvider {
    /// Parse a provider name from configuration.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(Error::ModelProvider(format!("Unsupported provider: {}", other))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Read the API key from the environment.
    pub fn api_key(self) -> Option<Secret<String>> {
        std::env::var(self.api_key_var())
            .ok()
            .map(Secret::new)
            .filter(|key| !key.expose_secret().trim().is_empty())
    }
}

/// Which provider and model a client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigConfig {
    pub provider: RigProvider,
    pub model: String,
}

impl RigConfig {
    pub fn new(provider: RigProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

/// Rig-based LLM client.
pub struct RigLlmClient {
    config: RigConfig,
}

impl RigLlmClient {
    pub fn new(config: RigConfig) -> Self {
        Self { config }
    }

    /// OpenAI GPT-4o-mini.
    pub fn gpt4o_mini() -> Self {
        Self::new(RigConfig::new(RigProvider::OpenAI, "gpt-4o-mini"))
    }

    /// Claude Haiku.
    pub fn claude_haiku() -> Self {
        Self::new(RigConfig::new(RigProvider::Anthropic, "claude-3-haiku-20240307"))
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Flatten a conversation into one role-tagged prompt.
    fn build_prompt(&self, messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .map(|msg| {
                let role = match msg.role.as_str() {
                    "system" => "System",
                    "user" => "User",
                    "assistant" => "Assistant",
                    other => other,
                };
                format!("{}: {}\n\n", role, msg.content)
            })
            .collect()
    }

    /// Rig's `from_env` panics without a key, so check first.
    fn ensure_key(&self) -> Result<()> {
        let provider = self.config.provider;
        match provider.api_key() {
            Some(_) => Ok(()),
            None => Err(Error::ModelProvider(format!("{} not set", provider.api_key_var()))),
        }
    }

    /// Rough token estimate at four bytes per token.
    fn usage(prompt: &str, response: &str) -> LlmUsage {
        LlmUsage {
            prompt_tokens: (prompt.len() / 4) as u64,
            completion_tokens: (response.len() / 4) as u64,
            total_tokens: ((prompt.len() + response.len()) / 4) as u64,
        }
    }

    /// Send one prompt to the configured provider's agent.
    async fn prompt_provider(&self, prompt: &str) -> Result<String> {
        use rig::providers::{anthropic, openai};

        self.ensure_key()?;
        let model = self.config.model.as_str();
        let reply = match self.config.provider {
            RigProvider::OpenAI => {
                openai::Client::from_env()
                    .agent(model)
                    .temperature(ROUTING_TEMPERATURE)
                    .build()
                    .prompt(prompt)
                    .await
            }
            RigProvider::Anthropic => {
                anthropic::Client::from_env()
                    .agent(model)
                    .temperature(ROUTING_TEMPERATURE)
                    .build()
                    .prompt(prompt)
                    .await
            }
        };
        reply.map_err(|e| Error::ModelProvider(format!("{} error: {}", self.config.provider.name(), e)))
    }
}

#[async_trait]
impl LlmClient for RigLlmClient {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        tracing::debug!(
            provider = ?self.config.provider,
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Calling LLM"
        );

        let content = self.prompt_provider(prompt).await?;
        Ok(LlmResponse {
            usage: Self::usage(prompt, &content),
            content,
            finish_reason: "stop".to_string(),
        })
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<LlmResponse> {
        let prompt = self.build_prompt(messages);
        self.complete(&prompt).await
    }
}

/// Create a client for a configured provider and model.
///
/// Fails when the provider is unknown or its API key is missing.
pub fn create_client(provider: &str, model: &str) -> Result<RigLlmClient> {
    let client = RigLlmClient::new(RigConfig::new(RigProvider::parse(provider)?, model));
    client.ensure_key()?;
    Ok(client)
}

/// Create a default LLM client based on available API keys.
pub fn create_default_client() -> Result<RigLlmClient> {
    if RigProvider::OpenAI.api_key().is_some() {
        Ok(RigLlmClient::gpt4o_mini())
    } else if RigProvider::Anthropic.api_key().is_some() {
        Ok(RigLlmClient::claude_haiku())
    } else {
        Err(Error::ModelProvider(
            "No API key found. Set OPENAI_API_KEY or ANTHROPIC_API_KEY".to_string(),
        ))
    }
}
