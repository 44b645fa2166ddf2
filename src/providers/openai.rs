use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{status_error, transport_error, Provider};

// @const: Public API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// OpenAI client for the chat completions API
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// Optional organization id
    organization: Option<String>,
    /// API base URL (empty means the public API)
    endpoint: String,
    /// Model used by `test_connection`
    model: String,
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// One chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIChoiceMessage,
}

/// Assistant message; `content` is null for refusals and tool calls
#[derive(Debug, Deserialize)]
pub struct OpenAIChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl OpenAIRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
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

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        organization: Option<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            organization: organization.filter(|o| !o.trim().is_empty()),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        let base = if self.endpoint.trim().is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim()
        };
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let mut builder = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key);
        if let Some(organization) = &self.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("OpenAI", e))?;

        if !response.status().is_success() {
            return Err(status_error("OpenAI", response).await);
        }

        let body = response.text().await.map_err(|e| transport_error("OpenAI", e))?;
        serde_json::from_str::<OpenAIResponse>(&body)
            .map_err(|e| ProviderError::ParseError(format!("OpenAI: {}", e)))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = OpenAIRequest::new(&self.model)
            .add_message("user", "Hello")
            .max_tokens(5);
        self.complete(request).await.map(|_| ())
    }

    fn extract_text(response: &OpenAIResponse) -> String {
        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
