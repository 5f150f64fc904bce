//! Authentication module
//!
//! Turns the credential presented with a request into an [`Identity`].
//! The gate depends only on the [`TokenVerifier`] trait; HS256 JWT is the
//! implementation wired up by the binary.
//!
//! [`Identity`]: crate::access_control::Identity

pub mod jwt;
pub mod secret;
pub mod verifier;

pub use jwt::{JwtVerifier, PortalClaims, TokenIssuer};
pub use secret::SigningSecret;
pub use verifier::{SharedVerifier, TokenVerifier};

use crate::config::AuthConfig;
use crate::error::ConfigError;
use std::sync::Arc;
use std::time::Duration;

/// Create the token verifier from configuration
pub fn create_verifier(config: &AuthConfig) -> Result<SharedVerifier, ConfigError> {
    let secret = config.jwt_secret.as_ref().ok_or_else(|| ConfigError::Missing {
        field: "auth.jwt_secret".to_string(),
    })?;
    Ok(Arc::new(JwtVerifier::new(secret, config.leeway_secs)))
}

/// Create a token issuer from configuration
pub fn create_issuer(config: &AuthConfig) -> Result<TokenIssuer, ConfigError> {
    let secret = config.jwt_secret.as_ref().ok_or_else(|| ConfigError::Missing {
        field: "auth.jwt_secret".to_string(),
    })?;
    Ok(TokenIssuer::new(
        secret,
        Duration::from_secs(config.token_ttl_secs),
    ))
}
