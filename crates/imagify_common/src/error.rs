// --- File: crates/imagify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// Message returned to clients for every failure that is not a business outcome.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// The base error type for all Imagify errors.
///
/// The first four variants are business outcomes whose message is shown to the
/// caller as-is. The rest are infrastructure failures: they are logged with
/// full detail and reach the caller only as [`GENERIC_ERROR_MESSAGE`].
/// Each crate extends this by implementing `From<SpecificError> for ImagifyError`.
#[derive(Error, Debug)]
pub enum ImagifyError {
    /// Input is missing or malformed
    #[error("{0}")]
    ValidationError(String),

    /// Resource already exists (e.g. a registered email)
    #[error("{0}")]
    ConflictError(String),

    /// Resource could not be found
    #[error("{0}")]
    NotFoundError(String),

    /// Credentials, token or signature did not check out
    #[error("{0}")]
    AuthError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ImagifyError {
    /// True for outcomes the caller is meant to see verbatim.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            ImagifyError::ValidationError(_)
                | ImagifyError::ConflictError(_)
                | ImagifyError::NotFoundError(_)
                | ImagifyError::AuthError(_)
        )
    }

    /// The message safe to put in a response body.
    pub fn public_message(&self) -> String {
        if self.is_business() {
            self.to_string()
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, ImagifyError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, ImagifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, ImagifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| ImagifyError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, ImagifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| ImagifyError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for ImagifyError {
    fn from(err: reqwest::Error) -> Self {
        ImagifyError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for ImagifyError {
    fn from(err: serde_json::Error) -> Self {
        ImagifyError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ImagifyError {
    fn from(err: std::io::Error) -> Self {
        ImagifyError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> ImagifyError {
    ImagifyError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> ImagifyError {
    ImagifyError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> ImagifyError {
    ImagifyError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> ImagifyError {
    ImagifyError::ConflictError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> ImagifyError {
    ImagifyError::AuthError(message.to_string())
}

pub fn database_error<T: fmt::Display>(message: T) -> ImagifyError {
    ImagifyError::DatabaseError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> ImagifyError {
    ImagifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> ImagifyError {
    ImagifyError::InternalError(message.to_string())
}
