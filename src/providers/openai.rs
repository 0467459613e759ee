use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::app_config::InferenceConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Error code the endpoint uses to signal rate limiting
pub const RATE_LIMIT_CODE: &str = "rate_limit_exceeded";

/// Client for OpenAI-compatible chat-completions endpoints
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Full chat-completions URL
    endpoint: String,
    /// Fixed sampling parameters copied into every request
    params: InferenceConfig,
}

/// Chat-completions request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Streaming is never used
    stream: bool,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Top probability mass to consider (nucleus sampling)
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,

    /// Reasoning effort hint ("low", "medium", "high")
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<String>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat-completions response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Completions, the first one is used
    pub choices: Vec<OpenAIChoice>,
}

/// Individual completion in a response
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
}

/// Error envelope returned on non-success responses
#[derive(Debug, Deserialize)]
pub struct OpenAIErrorEnvelope {
    pub error: OpenAIErrorBody,
}

/// Structured error details
#[derive(Debug, Deserialize)]
pub struct OpenAIErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Machine-readable code, e.g. "rate_limit_exceeded"
    #[serde(default)]
    pub code: Option<String>,
}

impl Default for OpenAIRequest {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            stream: false,
            temperature: None,
            top_p: None,
            reasoning_effort: None,
            max_completion_tokens: None,
        }
    }
}

impl OpenAIRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the top_p (nucleus sampling)
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the reasoning effort hint
    pub fn reasoning_effort(mut self, effort: impl Into<String>) -> Self {
        self.reasoning_effort = Some(effort.into());
        self
    }

    /// Set the output token ceiling
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_tokens);
        self
    }
}

impl OpenAI {
    /// Create a new client from the inference settings
    pub fn new(api_key: impl Into<String>, params: InferenceConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(params.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: params.endpoint.clone(),
            params,
        })
    }

    /// Build the single-message request for a prompt
    pub fn build_request(&self, prompt: &str) -> OpenAIRequest {
        OpenAIRequest::new(&self.params.model)
            .add_message("user", prompt)
            .temperature(self.params.temperature)
            .top_p(self.params.top_p)
            .reasoning_effort(&self.params.reasoning_effort)
            .max_tokens(self.params.max_tokens)
    }

    /// Send a chat-completions request
    pub async fn send(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let response = self.client.post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response.headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());

            let provider_error = classify_error(status, retry_after.as_deref(), &error_text);
            if !provider_error.is_rate_limit() {
                error!("Inference API error ({}): {}", status, error_text);
            }
            return Err(provider_error);
        }

        let body = response.text().await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str::<OpenAIResponse>(&body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract the first completion's text, unmodified
    pub fn extract_text(response: &OpenAIResponse) -> Result<String, ProviderError> {
        response.choices.first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ProviderError::ParseError("response contained no completions".to_string()))
    }
}

impl fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAI")
            .field("endpoint", &self.endpoint)
            .field("model", &self.params.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for OpenAI {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self.build_request(prompt);
        debug!("Sending {} prompt chars to {}", prompt.chars().count(), self.endpoint);

        let response = self.send(&request).await?;
        Self::extract_text(&response)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Parse a `Retry-After` value given in (possibly fractional) seconds
pub fn parse_retry_after(value: &str) -> Option<u64> {
    let value = value.trim();

    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }

    value.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.ceil() as u64)
}

/// Turn a non-success response into a provider error
pub fn classify_error(status: StatusCode, retry_after: Option<&str>, body: &str) -> ProviderError {
    let envelope = serde_json::from_str::<OpenAIErrorEnvelope>(body).ok();
    let code = envelope.as_ref().and_then(|e| e.error.code.as_deref());
    let message = envelope.as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| body.to_string());

    if code == Some(RATE_LIMIT_CODE) || status == StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimitExceeded {
            message,
            retry_after_secs: retry_after.and_then(parse_retry_after),
        };
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ProviderError::AuthenticationError(message);
    }

    ProviderError::ApiError {
        status_code: status.as_u16(),
        message: body.to_string(),
    }
}
