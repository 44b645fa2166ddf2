/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which turns a profile
 * into a provider client, builds the system prompt and normalizes replies.
 */

use crate::app_config::{Profile, ProviderKind};
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

// @const: Appended to the profile prompt for line-aligned batches
const LINE_CONTRACT: &str = "The user message contains one text per line. Translate every line \
independently and reply with exactly one line per input line, in the same order, without \
numbering, quotes or commentary. Keep tags such as <x id=\"1\"/> or <g id=\"2\">...</g> unchanged.";

// @const: Appended to the profile prompt for whole documents
const BLOCK_CONTRACT: &str = "The user message is a whole document. Reply with the translated \
document only, keeping its paragraph breaks.";

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },

    /// Deterministic in-process provider
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Main translation service
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Profile the service was built from
    profile: Profile,
}

impl TranslationService {
    /// Create a service for the profile's provider
    pub fn new(profile: Profile) -> Self {
        let provider = match profile.provider {
            ProviderKind::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(
                    profile.api_key.trim(),
                    profile.organization_id.clone(),
                    profile.endpoint.clone(),
                    profile.effective_model(),
                    profile.timeout_secs,
                ),
            },
            ProviderKind::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(
                    profile.api_key.trim(),
                    profile.endpoint.clone(),
                    profile.effective_model(),
                    profile.timeout_secs,
                ),
            },
        };
        Self { provider, profile }
    }

    /// Create a service backed by a mock provider
    pub fn with_mock(profile: Profile, client: MockProvider) -> Self {
        Self {
            provider: TranslationProviderImpl::Mock { client },
            profile,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn provider_name(&self) -> &str {
        match &self.provider {
            TranslationProviderImpl::OpenAI { .. } => "OpenAI",
            TranslationProviderImpl::Anthropic { .. } => "Anthropic",
            TranslationProviderImpl::Mock { .. } => "Mock",
        }
    }

    /// Check the profile can be used for a request
    pub fn ensure_ready(profile: &Profile) -> Result<(), TranslationError> {
        if !profile.has_credentials() {
            return Err(TranslationError::MissingCredential(profile.name.clone()));
        }
        if profile.target_language.trim().is_empty() {
            return Err(TranslationError::MissingTargetLanguage(profile.name.clone()));
        }
        Ok(())
    }

    /// Target language as written in prompts
    pub fn target_language_name(&self) -> String {
        language_utils::display_language(&self.profile.target_language)
    }

    /// Profile prompt followed by the reply contract for the batch shape
    pub fn system_prompt(&self, block_mode: bool) -> String {
        let language = self.target_language_name();
        let base = if self.profile.system_prompt.trim().is_empty() {
            format!("Translate the following text to {}.", language)
        } else {
            self.profile.system_prompt.trim().to_string()
        };
        let contract = if block_mode { BLOCK_CONTRACT } else { LINE_CONTRACT };
        format!("{}\n\nTarget language: {}.\n{}", base, language, contract)
    }

    /// Send one batch payload and return the normalized reply text
    pub async fn translate(&self, text: &str, block_mode: bool) -> Result<String, TranslationError> {
        Self::ensure_ready(&self.profile)?;
        let system_prompt = self.system_prompt(block_mode);
        log::debug!(
            "Sending {} chars to {} ({})",
            text.chars().count(),
            self.provider_name(),
            self.profile.effective_model()
        );

        let result = match &self.provider {
            TranslationProviderImpl::OpenAI { client } => {
                let mut request = OpenAIRequest::new(self.profile.effective_model())
                    .add_message("system", system_prompt)
                    .add_message("user", text)
                    .max_tokens(self.profile.max_tokens);
                if let Some(temperature) = self.profile.temperature {
                    request = request.temperature(temperature);
                }
                client.complete(request).await.map(|r| OpenAI::extract_text(&r))
            }
            TranslationProviderImpl::Anthropic { client } => {
                let mut request = AnthropicRequest::new(self.profile.effective_model(), self.profile.max_tokens)
                    .system(system_prompt)
                    .add_message("user", text);
                if let Some(temperature) = self.profile.temperature {
                    request = request.temperature(temperature);
                }
                client.complete(request).await.map(|r| Anthropic::extract_text(&r))
            }
            TranslationProviderImpl::Mock { client } => {
                let request = MockRequest {
                    system_prompt,
                    text: text.to_string(),
                    target_language: self.target_language_name(),
                };
                client.complete(request).await.map(|r| MockProvider::extract_text(&r))
            }
        };

        match result {
            Ok(reply) => Ok(normalize_reply(&reply)),
            Err(e) => {
                log::error!("{} request failed: {}", self.provider_name(), e);
                Err(TranslationError::Provider(e))
            }
        }
    }

    /// Test the connection to the translation provider.
    ///
    /// Only the credential is required; the target language is not checked.
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        if !self.profile.has_credentials() {
            return Err(TranslationError::MissingCredential(self.profile.name.clone()));
        }
        log::debug!("Testing connection to {}", self.provider_name());
        let result = match &self.provider {
            TranslationProviderImpl::OpenAI { client } => client.test_connection().await,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
            TranslationProviderImpl::Mock { client } => client.test_connection().await,
        };
        result.map_err(TranslationError::Provider)
    }
}

/// Strip carriage returns and a wrapping Markdown code fence
pub fn normalize_reply(reply: &str) -> String {
    let text = reply.replace('\r', "");
    let trimmed = text.trim();
    if trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() >= 6 {
        let mut lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() >= 2 {
            lines.remove(0);
            lines.pop();
            return lines.join("\n");
        }
    }
    text
}
