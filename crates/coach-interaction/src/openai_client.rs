//! OpenAiClient - Direct REST client for the OpenAI Chat Completions API.
//!
//! Configuration priority: ~/.config/case-coach/secret.json > environment variables

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use coach_core::{CoachError, CompletionClient, CompletionError};
use coach_infrastructure::{SecretConfig, SecretStorage};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Completion client that talks to the OpenAI HTTP API.
///
/// Each call sends the prompt as a single user message; no conversation state
/// is kept between calls.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }

    /// Loads credentials from ~/.config/case-coach/secret.json or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/case-coach/secret.json
    /// 2. Environment variables (OPENAI_API_KEY, OPENAI_MODEL_NAME)
    ///
    /// Model name defaults to `gpt-3.5-turbo` if not specified.
    pub fn try_from_env() -> Result<Self, CoachError> {
        let secrets = SecretStorage::new().ok().and_then(|storage| match storage.load() {
            Ok(config) => Some(config),
            Err(err) => {
                debug!(error = %err, "secret.json not used");
                None
            }
        });

        let (api_key, model) = resolve_credentials(secrets, |key| env::var(key).ok())?;
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Points the client at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Applies a whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, CoachError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CoachError::config(format!("Failed to build HTTP client: {err}")))?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| CompletionError::ModelUnavailable {
                status_code: err.status().map(|status| status.as_u16()),
                message: format!("OpenAI API request failed: {err}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            warn!(status = status.as_u16(), "OpenAI API returned an error status");
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            CompletionError::InvalidResponse(format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = self.build_request(prompt);
        self.send_request(&request).await
    }
}

/// Picks the API key and model from `secret.json` first, then the environment.
fn resolve_credentials<F>(
    secrets: Option<SecretConfig>,
    lookup_env: F,
) -> Result<(String, String), CoachError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(openai) = secrets.and_then(|config| config.openai) {
        if openai.is_configured() {
            let model = openai
                .model_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
            return Ok((openai.api_key, model));
        }
    }

    let api_key = lookup_env("OPENAI_API_KEY")
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            CoachError::config(
                "OPENAI_API_KEY not found in ~/.config/case-coach/secret.json or environment variables",
            )
        })?;
    let model = lookup_env("OPENAI_MODEL_NAME")
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());

    Ok((api_key, model))
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| {
            CompletionError::InvalidResponse("OpenAI API returned no choices".into())
        })?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(CompletionError::EmptyCompletion);
    }
    Ok(content)
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> CompletionError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited {
            message,
            retry_after,
        },
        _ => CompletionError::ModelUnavailable {
            status_code: Some(status.as_u16()),
            message,
        },
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are not supported
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
