//! Error types for stylization and background removal.

/// Substring the service emits when a freshly provisioned key is not yet
/// usable. Always surfaced verbatim.
pub(crate) const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// Errors that can occur while building, sending or interpreting a request.
#[derive(Debug, thiserror::Error)]
pub enum VintifyError {
    /// No API key was supplied.
    #[error("API key is missing. Set GEMINI_API_KEY or pass a key explicitly.")]
    MissingCredential,

    /// The key exists but the service has not finished provisioning it.
    #[error("{0}")]
    EntityNotFound(String),

    /// The key was rejected.
    #[error("Invalid API key or insufficient permissions. Check your key and try again.")]
    InvalidApiKey,

    /// The service rejected the request as malformed.
    #[error("Invalid request. The image may be too large or the prompt may have been flagged.")]
    InvalidRequest,

    /// The service is overloaded; the user may try again.
    #[error("The service is currently overloaded. Please try again in a moment.")]
    ServiceOverloaded,

    /// Content was blocked by safety filters.
    #[error("Generation was blocked by safety filters. Try a different image or prompt.")]
    SafetyBlocked,

    /// The model answered with text instead of an image.
    #[error("The model declined to generate an image: {0}")]
    ModelDeclined(String),

    /// The response carried neither an image nor any text.
    #[error("No image was generated. Please try again.")]
    EmptyResponse,

    /// Unclassified failure; the original message is preserved.
    #[error("{0}")]
    Unknown(String),

    /// Background removal failed for any reason other than provisioning.
    #[error("Failed to remove background: {0}")]
    BackgroundRemovalFailed(String),

    /// A local upload could not be decoded.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// I/O error (e.g., reading an upload or saving a result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VintifyError {
    /// Classifies a raw transport error message.
    ///
    /// Checks run in a fixed priority order; the provisioning race is
    /// checked first so it is never reported as a bad key.
    pub fn classify(message: &str) -> Self {
        if message.contains(ENTITY_NOT_FOUND) {
            return Self::EntityNotFound(message.to_string());
        }
        if message.contains("403") || message.contains("API key") {
            return Self::InvalidApiKey;
        }
        if message.contains("400") {
            return Self::InvalidRequest;
        }
        let lower = message.to_lowercase();
        if message.contains("503") || lower.contains("overloaded") {
            return Self::ServiceOverloaded;
        }
        if lower.contains("safety") {
            return Self::SafetyBlocked;
        }
        Self::Unknown(message.to_string())
    }

    /// Returns true if a user retrying the same action may succeed.
    ///
    /// Nothing in this crate retries automatically.
    pub fn is_user_retryable(&self) -> bool {
        matches!(self, Self::ServiceOverloaded | Self::EntityNotFound(_))
    }
}

/// Result type alias for vintify operations.
pub type Result<T> = std::result::Result<T, VintifyError>;

/// Truncates long error bodies so they stay readable when displayed.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    const MAX_LEN: usize = 500;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_LEN {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_LEN).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_not_found_takes_priority() {
        let msg = "403 Forbidden: Requested entity was not found.";
        match VintifyError::classify(msg) {
            VintifyError::EntityNotFound(m) => assert_eq!(m, msg),
            other => panic!("expected EntityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_priority_order() {
        assert!(matches!(
            VintifyError::classify("403 PERMISSION_DENIED"),
            VintifyError::InvalidApiKey
        ));
        assert!(matches!(
            VintifyError::classify("API key not valid. Please pass a valid API key."),
            VintifyError::InvalidApiKey
        ));
        // Key signals win over malformed-request signals.
        assert!(matches!(
            VintifyError::classify("400 INVALID_ARGUMENT: API key expired"),
            VintifyError::InvalidApiKey
        ));
        assert!(matches!(
            VintifyError::classify("400 INVALID_ARGUMENT"),
            VintifyError::InvalidRequest
        ));
        assert!(matches!(
            VintifyError::classify("503 UNAVAILABLE"),
            VintifyError::ServiceOverloaded
        ));
        assert!(matches!(
            VintifyError::classify("The model is overloaded."),
            VintifyError::ServiceOverloaded
        ));
        assert!(matches!(
            VintifyError::classify("Response blocked: SAFETY"),
            VintifyError::SafetyBlocked
        ));
    }

    #[test]
    fn test_unknown_preserves_message() {
        let err = VintifyError::classify("connection reset by peer");
        assert_eq!(err.to_string(), "connection reset by peer");
        assert!(matches!(err, VintifyError::Unknown(_)));
    }

    #[test]
    fn test_is_user_retryable() {
        assert!(VintifyError::ServiceOverloaded.is_user_retryable());
        assert!(VintifyError::EntityNotFound("x".into()).is_user_retryable());

        assert!(!VintifyError::InvalidApiKey.is_user_retryable());
        assert!(!VintifyError::SafetyBlocked.is_user_retryable());
        assert!(!VintifyError::EmptyResponse.is_user_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = VintifyError::ModelDeclined("I can't edit photos of people.".into());
        assert_eq!(
            err.to_string(),
            "The model declined to generate an image: I can't edit photos of people."
        );

        let err = VintifyError::BackgroundRemovalFailed("boom".into());
        assert_eq!(err.to_string(), "Failed to remove background: boom");
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let long = "x".repeat(600);
        let out = sanitize_error_message(&long);
        assert_eq!(out.len(), 503);
        assert!(out.ends_with("..."));
        assert_eq!(sanitize_error_message("  short  "), "short");
    }
}
