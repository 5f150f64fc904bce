//! HS256 signing secret

use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::Deserialize;
use std::fmt;

/// Shared HMAC key for portal tokens
///
/// Only ever turned into jsonwebtoken keys; `Debug` never shows the bytes so
/// the secret stays out of logged configuration.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Whitespace-only secrets count as unset
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.0.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.0.as_bytes())
    }

    /// Compare against a candidate without printing either side
    pub fn is(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SigningSecret::new("jwt-signing-key");
        let output = format!("{:?}", secret);
        assert!(!output.contains("jwt-signing-key"));
        assert!(output.contains("REDACTED"));
    }

    #[test]
    fn test_redacted_inside_config_debug() {
        let config = crate::config::AuthConfig {
            jwt_secret: Some(SigningSecret::new("jwt-signing-key")),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("jwt-signing-key"));
    }

    #[test]
    fn test_blank() {
        assert!(SigningSecret::new("").is_blank());
        assert!(SigningSecret::new("  \n").is_blank());
        assert!(!SigningSecret::new("k").is_blank());
    }

    #[test]
    fn test_deserialize_from_string() {
        let secret: SigningSecret = serde_json::from_str(r#""from-json""#).unwrap();
        assert!(secret.is("from-json"));
    }
}
