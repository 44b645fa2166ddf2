/*!
 * Tests for error types and conversions
 */

use polyedit::errors::{AppError, ParseError, ProviderError, SerializeError, TranslationError};

#[test]
fn test_from_status_withAuthCodes_shouldMapToAuthenticationError() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "forbidden"), ProviderError::AuthenticationError(_)));
}

#[test]
fn test_from_status_withOtherCodes_shouldKeepStatus() {
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    match ProviderError::from_status(500, "boom") {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected variant: {:?}", other),
    }
}

#[test]
fn test_translation_error_fromProvider_shouldWrapMessage() {
    let error: TranslationError = ProviderError::ConnectionError("refused".to_string()).into();
    assert_eq!(error.to_string(), "Provider error: Connection error: refused");
}

#[test]
fn test_parse_error_display_shouldNameFormatAndKey() {
    let error = ParseError::DuplicateKey {
        format: "WebVTT",
        key: "00:00:01.000 --> 00:00:02.000".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("WebVTT"));
    assert!(message.contains("00:00:01.000 --> 00:00:02.000"));
}

#[test]
fn test_app_error_fromSerializeError_shouldConvert() {
    let error: AppError = SerializeError::MissingEnvelope("XLIFF").into();
    assert!(error.to_string().contains("XLIFF"));
}
