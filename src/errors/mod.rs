//! # Error Handling
//!
//! Crate-level error type. Secret operations have their own
//! [`SecretsError`](crate::secrets::SecretsError); this wraps it together with
//! configuration and form failures for the console and its setup code.

use crate::secrets::{FormError, SecretsError};

/// Custom result type for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the secrets console
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration failed field validation
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Remote secret API errors
    #[error(transparent)]
    Secrets(#[from] SecretsError),

    /// Rejected form actions
    #[error(transparent)]
    Form(#[from] FormError),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }
}
