/*!
 * Error types for the polyedit application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while turning raw file bytes into a segment model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input bytes are not valid UTF-8
    #[error("{format} file is not valid UTF-8 text")]
    InvalidEncoding {
        /// Format display name
        format: &'static str,
    },

    /// Input is not well-formed in its declared format
    #[error("Malformed {format} file: {reason}")]
    Malformed {
        /// Format display name
        format: &'static str,
        /// What was wrong
        reason: String,
    },

    /// A key-value entry holds a nested structure
    #[error("Unsupported value for key '{key}': only flat string maps can be edited")]
    UnsupportedValue {
        /// Offending key
        key: String,
    },

    /// The document parsed but contained no translation units
    #[error("No translation units found in the document")]
    NoUnits,

    /// The same key appears twice
    #[error("Duplicate {format} key '{key}'")]
    DuplicateKey {
        /// Format display name
        format: &'static str,
        /// Repeated key
        key: String,
    },
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Map a non-success HTTP status and message to the matching variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors that can occur during batch translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The active profile has no API key
    #[error("No API key configured for profile '{0}'")]
    MissingCredential(String),

    /// The active profile has no target language
    #[error("No target language configured for profile '{0}'")]
    MissingTargetLanguage(String),

    /// No segments to send
    #[error("Nothing to translate: the document has no segments")]
    NothingToTranslate,

    /// A translation request is already in flight
    #[error("A translation request is already in progress")]
    Busy,

    /// The document changed while the request was in flight
    #[error("Translation reply belongs to a document that is no longer loaded")]
    StaleDocument,
}

/// Errors raised by a document renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer could not produce output
    #[error("Rendering {format} failed: {message}")]
    Failed {
        /// Format display name
        format: &'static str,
        /// Renderer message
        message: String,
    },
}

/// Errors that can occur when turning a segment model back into bytes
#[derive(Error, Debug)]
pub enum SerializeError {
    /// The envelope required by the format is missing
    #[error("Missing document envelope for {0}")]
    MissingEnvelope(&'static str),

    /// Writing XML failed
    #[error("XML write error: {0}")]
    Xml(String),

    /// Writing JSON failed
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    /// Renderer failure for block formats
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from serialization
    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
