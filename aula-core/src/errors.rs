//! Error types for the aula pipeline.
//!
//! Every failure a caller of the request pipeline can observe is one of the
//! [`ApiError`] variants. Classification is always derived from the HTTP
//! status code or the transport outcome, never from message text.

use thiserror::Error;

/// User-facing message for transport-level failures.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Message shown when the session could not be renewed.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please sign in again";

/// The main error type for aula operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The session could not be renewed; credentials were cleared.
    #[error("Session expired, please sign in again")]
    AuthExpired,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or a generic fallback.
        message: String,
    },

    /// No response was received (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Durable storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create a request failure with a message.
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Create a request failure carrying the generic fallback message.
    pub fn generic_failure(status: u16) -> Self {
        Self::request_failed(status, format!("Request failed ({})", status))
    }

    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a malformed-response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Get the HTTP status if the backend answered.
    ///
    /// `AuthExpired` has none: the session may have ended on a network
    /// failure or a 5xx from the refresh endpoint.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error ended the session.
    pub fn is_session_ending(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Whether the caller may reasonably retry or correct the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { .. } | Self::Network(_) | Self::MalformedResponse(_)
        )
    }

    /// Message suitable for a toast or inline error.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::RequestFailed { message, .. } => message.clone(),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("invalid url: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generic_failure_message() {
        let err = ApiError::generic_failure(500);
        assert_eq!(err.to_string(), "Request failed (500)");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_auth_expired_is_terminal() {
        let err = ApiError::AuthExpired;
        assert!(err.is_session_ending());
        assert!(!err.is_recoverable());
        assert_eq!(err.user_message(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_network_error_uses_connectivity_message() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.status(), None);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_request_failed_displays_server_message() {
        let err = ApiError::request_failed(409, "Classroom already booked");
        assert_eq!(err.to_string(), "Classroom already booked");
        assert_eq!(err.user_message(), "Classroom already booked");
    }

    #[test]
    fn test_from_serde_error() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }
}
