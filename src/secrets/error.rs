//! Error types for secret operations.

use thiserror::Error;

use super::types::Scope;

/// Result type for secret operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors raised while talking to the remote secret API.
///
/// Callers treat every variant the same way: the failure is reported upward
/// with [`SecretsError::user_message`] when the collaborator supplied one.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The request never produced an HTTP response (connect, timeout, TLS).
    #[error("Request failed: {}", .message.as_deref().unwrap_or("no details"))]
    Request { message: Option<String> },

    /// The API answered with a non-success status.
    #[error("HTTP request failed with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Http { status: u16, message: Option<String> },

    /// The secret does not exist in the given scope.
    #[error("Secret \"{name}\" not found")]
    NotFound { name: String, scope: Scope },

    /// A secret name that cannot be addressed.
    #[error("Invalid secret name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client could not be configured.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SecretsError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request { message: non_blank(message.into()) }
    }

    pub fn http(status: u16, message: Option<String>) -> Self {
        Self::Http { status, message: message.and_then(non_blank) }
    }

    pub fn not_found(name: impl Into<String>, scope: Scope) -> Self {
        Self::NotFound { name: name.into(), scope }
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into(), reason: reason.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Message supplied by the collaborator, if any.
    ///
    /// Transport failures and empty error bodies yield `None`; the caller then
    /// falls back to its own fixed text.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => message.as_deref(),
            Self::Request { message } => message.as_deref(),
            Self::NotFound { .. } | Self::InvalidName { .. } | Self::Config { .. } => None,
            Self::Serialization(_) => None,
        }
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SecretsError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::http(status.as_u16(), None),
            None => Self::request(err.to_string()),
        }
    }
}

fn non_blank(message: String) -> Option<String> {
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}
