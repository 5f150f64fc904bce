//! Error types for campus-gate
//!
//! This module defines the error hierarchy used throughout the application.
//! Access denials are not errors: they are ordinary [`AccessDecision`] values
//! produced by the gate. The types here cover configuration, credential
//! verification and the HTTP transport.
//!
//! [`AccessDecision`]: crate::access_control::AccessDecision

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Credential verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Role '{0}' has no permitted paths")]
    EmptyRole(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to resolve a credential into an identity.
///
/// Every variant leads the gate to deny with `InvalidCredential`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token rejected: {0}")]
    Rejected(String),
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => VerificationError::Expired,
            ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => VerificationError::Malformed,
            _ => VerificationError::Rejected(err.to_string()),
        }
    }
}

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::{Error as JwtError, ErrorKind};

    #[test]
    fn test_verification_error_from_jwt() {
        let err: VerificationError = JwtError::from(ErrorKind::ExpiredSignature).into();
        assert_eq!(err, VerificationError::Expired);

        let err: VerificationError = JwtError::from(ErrorKind::InvalidSignature).into();
        assert_eq!(err, VerificationError::InvalidSignature);

        let err: VerificationError = JwtError::from(ErrorKind::InvalidToken).into();
        assert_eq!(err, VerificationError::Malformed);

        let err: VerificationError = JwtError::from(ErrorKind::ImmatureSignature).into();
        assert!(matches!(err, VerificationError::Rejected(_)));
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::UnknownRole("admin".into());
        assert!(err.to_string().contains("admin"));

        let err = ConfigError::EmptyRole("student".into());
        assert!(err.to_string().contains("student"));
    }
}
