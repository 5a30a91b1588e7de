//! Push request error types.

use thiserror::Error;

/// Result type for push operations.
pub type Result<T> = std::result::Result<T, PushError>;

/// Push request errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    /// Credentials or client settings are missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The argument tree failed local validation; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A setter was called with malformed input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A per-platform block was requested but no alert text is available.
    #[error("Has no alert: set one on the platform block or call set_notification first")]
    MissingAlert,

    /// Network-level failure (connect, timeout, TLS, DNS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The push service answered with an error object.
    #[error("API error {code}: {message}")]
    Api {
        /// Numeric code reported by the service.
        code: i64,
        /// Local message for the code.
        message: String,
    },

    /// The argument tree could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl PushError {
    /// Check if this error was raised before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::Validation(_)
                | Self::InvalidArgument(_)
                | Self::MissingAlert
                | Self::Serialization(_)
        )
    }

    /// Get the service error code if this is an API error.
    pub fn api_code(&self) -> Option<i64> {
        if let Self::Api { code, .. } = self {
            Some(*code)
        } else {
            None
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {}", err))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PushError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for PushError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("Invalid URL: {}", err))
    }
}
