//! Token verifier trait
//!
//! The gate never inspects credentials itself. It hands them to a verifier
//! that either returns the caller's identity or a typed failure.

use crate::access_control::Identity;
use crate::error::VerificationError;
// async_trait required for dyn-compatibility with Arc<dyn TokenVerifier>
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves an opaque credential into an identity
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Validate the credential (signature, expiry) and return the identity
    async fn verify(&self, credential: &str) -> Result<Identity, VerificationError>;

    /// Get a description of the verification method (for logging)
    fn verifier_type(&self) -> &'static str;
}

/// Shared verifier handle
pub type SharedVerifier = Arc<dyn TokenVerifier>;
