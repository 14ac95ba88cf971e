//! Error types for the blogdesk client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, API envelope, session, input validation and storage errors.

use std::fmt;
use thiserror::Error;

/// Envelope code reported by the backend on success.
pub const SUCCESS_CODE: i32 = 200;

/// Envelope code reported by the backend for an invalid or expired session.
pub const AUTH_REJECTED_CODE: i32 = 401;

/// The unified error type for blogdesk operations.
///
/// This error type covers all possible failure modes in the client,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, undecodable body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The backend answered with a non-success envelope.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Client-side session conditions.
    #[error("session error: {0}")]
    Auth(#[from] AuthError),

    /// Input validation errors (URL, token, configuration).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Token persistence failures.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns true when the backend rejected the current credentials.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Error::Api(api) if api.is_auth_rejected())
    }

    /// Returns the message to show a user for this error.
    ///
    /// The server message is used when the backend supplied one; every
    /// other failure maps to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api(ApiError {
                message: Some(message),
                ..
            }) if !message.trim().is_empty() => message.clone(),
            Error::Auth(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A non-success envelope returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Envelope code (or the HTTP status when no envelope was returned).
    pub code: i32,
    /// Message from the server, if any.
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: i32, message: Option<String>) -> Self {
        Self { code, message }
    }

    /// Check if the backend rejected the session.
    pub fn is_auth_rejected(&self) -> bool {
        self.code == AUTH_REJECTED_CODE
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {}", self.code)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Session errors raised on the client without a server round trip.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Verification was attempted before registering.
    #[error("no registration is awaiting verification")]
    NoPendingRegistration,

    /// Verification was attempted with a blank code.
    #[error("please enter the verification code")]
    MissingVerificationCode,

    /// A newer session action completed first; this result was discarded.
    #[error("superseded by a newer session action")]
    Superseded,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Token is empty after sanitization or cannot be sent in a header.
    #[error("invalid token: {reason}")]
    Token { reason: String },

    /// Identifier that cannot be used as a URL path segment.
    #[error("invalid path segment '{value}': {reason}")]
    PathSegment { value: String, reason: String },

    /// Unknown deployment environment name.
    #[error("unknown environment '{value}'")]
    Environment { value: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Token storage errors.
#[derive(Debug, Error)]
#[error("{operation} failed: {message}")]
pub struct StorageError {
    /// What the store was doing.
    pub operation: &'static str,
    /// Underlying failure.
    pub message: String,
}

impl StorageError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_message() {
        let err = Error::from(ApiError::new(400, Some("Wrong password".to_string())));
        assert_eq!(err.user_message("Login failed"), "Wrong password");
    }

    #[test]
    fn user_message_falls_back_for_blank_or_transport() {
        let blank = Error::from(ApiError::new(500, Some("  ".to_string())));
        assert_eq!(blank.user_message("Login failed"), "Login failed");

        let transport = Error::from(TransportError::Timeout { duration_ms: 10 });
        assert_eq!(transport.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn auth_rejected_only_for_401() {
        assert!(Error::from(ApiError::new(401, None)).is_auth_rejected());
        assert!(!Error::from(ApiError::new(403, None)).is_auth_rejected());
        assert!(!Error::from(AuthError::Superseded).is_auth_rejected());
    }

    #[test]
    fn api_error_display() {
        let err = ApiError::new(500, Some("boom".to_string()));
        assert_eq!(err.to_string(), "code 500: boom");
        assert_eq!(ApiError::new(404, None).to_string(), "code 404");
    }
}
