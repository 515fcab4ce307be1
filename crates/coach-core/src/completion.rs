//! The completion capability consumed by the interview.
//!
//! The orchestrator only ever needs `complete(prompt) -> text`. Provider clients
//! implement [`CompletionClient`]; the core never retries or caches around it.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a completion provider.
///
/// The core does not interpret these. They are carried to the driver inside
/// [`CoachError::ModelCallFailure`](crate::CoachError::ModelCallFailure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Network failure or provider-side error.
    #[error("model unavailable: {message}")]
    ModelUnavailable {
        status_code: Option<u16>,
        message: String,
    },

    /// Credentials were missing or rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The provider throttled the request.
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// The provider answered with a body that could not be understood.
    #[error("invalid response from model: {0}")]
    InvalidResponse(String),

    /// The provider answered with no text, or only whitespace.
    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl CompletionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            status_code: None,
            message: message.into(),
        }
    }

    /// Whether a driver could reasonably try the whole session again later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::ModelUnavailable { status_code, .. } => {
                status_code.is_none_or(|code| code >= 500)
            }
            _ => false,
        }
    }
}

/// A language model that turns one prompt into one piece of text.
///
/// Implementations must be stateless per call: every request carries its full
/// session-scoped prompt, so one client can be shared by independent sessions.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Name of the underlying model, for logging.
    fn model_name(&self) -> &str;

    /// Requests a single completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
