use thiserror::Error;

/// Main error type for the recommendation pipeline
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The language-model provider reported a rate limit or an exhausted quota.
    #[error("Provider quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RecommendError>;

/// One failed provider attempt, tagged where it happened with whether the
/// same request may be sent again.
#[derive(Debug)]
pub(crate) struct AttemptError {
    pub error: RecommendError,
    pub retryable: bool,
}

impl AttemptError {
    pub fn transient(error: RecommendError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }

    pub fn fatal(error: RecommendError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }

    /// Server errors and request timeouts may be retried; quota answers never are.
    pub fn from_status(status: reqwest::StatusCode, error: RecommendError) -> Self {
        let retryable = !error.is_quota_exceeded()
            && (status.is_server_error() || status == reqwest::StatusCode::REQUEST_TIMEOUT);
        Self { error, retryable }
    }
}

impl RecommendError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Quota errors are the only kind the orchestrator absorbs by switching to
    /// the rule-based strategy.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, RecommendError::QuotaExceeded(_))
    }

    /// Check whether the caller may reasonably retry the request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RecommendError::ProviderUnavailable(_)
                | RecommendError::Timeout(_)
                | RecommendError::QuotaExceeded(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            RecommendError::Config(_) => "CONFIG_ERROR",
            RecommendError::Validation(_) => "VALIDATION_ERROR",
            RecommendError::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            RecommendError::MalformedResponse(_) => "MALFORMED_PROVIDER_RESPONSE",
            RecommendError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            RecommendError::Timeout(_) => "TIMEOUT_ERROR",
            RecommendError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Message that is safe to show to API callers. Only validation errors
    /// echo their detail; provider and configuration internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            RecommendError::Validation(message) => message.clone(),
            RecommendError::Config(_) => {
                "Service configuration error. Please contact the administrator.".to_string()
            }
            RecommendError::Timeout(_) => {
                "A search provider took too long to respond. Please try again.".to_string()
            }
            _ => "Error processing recommendation. Please try again later.".to_string(),
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.public_message(),
                "retryable": self.is_retryable()
            }
        })
    }
}
