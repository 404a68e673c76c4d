//! Error types for Mealroute.

use thiserror::Error;

/// Result type alias using Mealroute's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Mealroute.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Request Errors
    // =========================================================================
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    #[error("Initialization failure: {0}")]
    Initialization(String),

    #[error("Classifier failure: {0}")]
    Classifier(String),

    #[error("Restaurant resolver failure: {0}")]
    Resolver(String),

    #[error("Constraint extraction failure: {0}")]
    Extraction(String),

    #[error("Search execution failure: {0}")]
    SearchExecution(String),

    #[error("Model provider error: {0}")]
    ModelProvider(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a malformed request error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// Create an initialization error.
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Create a classifier error.
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a resolver error.
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create an extraction error.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a search execution error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchExecution(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code for an error that reaches the caller.
    ///
    /// Only request-shape problems are client errors; everything else is
    /// reported as an infrastructure failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedRequest(_) => 400,
            _ => 500,
        }
    }

    /// Whether the pipeline may recover from this error locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Classifier(_) | Self::Extraction(_))
    }
}
