/*!
 * Provider implementations for language-model services.
 *
 * This module contains client implementations for the supported APIs:
 * - OpenAI: chat completions (`system` + `user` messages)
 * - Anthropic: messages API (`system` field + `user` message)
 * - Mock: deterministic provider for tests
 */

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Pull a human readable message out of an error body.
///
/// Both APIs answer `{"error": {"message": ...}}`; anything else is returned
/// as-is.
pub(crate) fn error_message_from_body(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "empty error body".to_string(),
        None => body.trim().to_string(),
    }
}

/// Classify a transport failure
pub(crate) fn transport_error(provider: &str, error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(format!("{}: {}", provider, error))
    } else {
        ProviderError::RequestFailed(format!("{}: {}", provider, error))
    }
}

/// Turn a non-success response into a typed error
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = error_message_from_body(&body);
    log::error!("{} API error ({}): {}", provider, status, message);
    ProviderError::from_status(status, message)
}

pub mod anthropic;
pub mod mock;
pub mod openai;
