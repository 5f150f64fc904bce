//! HS256 JSON Web Tokens
//!
//! Tokens carry `{id, name, email, role, iat, exp}` and are signed with a
//! shared secret.

use crate::access_control::{Identity, Role};
use crate::auth::secret::SigningSecret;
use crate::auth::verifier::TokenVerifier;
use crate::error::{TransportError, VerificationError};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Claims carried by a portal token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalClaims {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Missing claims decode as empty and are denied as an unknown role
    #[serde(default)]
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<PortalClaims> for Identity {
    fn from(claims: PortalClaims) -> Self {
        Identity {
            id: claims.id,
            name: claims.name,
            email: claims.email,
            role_claim: claims.role,
        }
    }
}

/// Verifies HS256 tokens signed with a shared secret
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &SigningSecret, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: secret.decoding_key(),
            validation,
        }
    }

    /// Decode and validate a token synchronously
    pub fn decode(&self, token: &str) -> Result<PortalClaims, VerificationError> {
        let data = jsonwebtoken::decode::<PortalClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, credential: &str) -> Result<Identity, VerificationError> {
        if credential.is_empty() {
            return Err(VerificationError::Malformed);
        }
        self.decode(credential).map(Identity::from)
    }

    fn verifier_type(&self) -> &'static str {
        "HS256 JWT"
    }
}

/// Mints HS256 tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        Self {
            encoding_key: secret.encoding_key(),
            ttl,
        }
    }

    /// Issue a token for a user
    pub fn issue(
        &self,
        id: &str,
        name: &str,
        email: Option<&str>,
        role: Role,
    ) -> Result<String, TransportError> {
        let now = now_epoch_seconds();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                TransportError::Signing(format!("token lifetime of {:?} is out of range", self.ttl))
            })?;
        let claims = PortalClaims {
            id: id.to_string(),
            name: name.to_string(),
            email: email.map(str::to_string),
            role: role.as_str().to_string(),
            iat: now,
            exp,
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &PortalClaims) -> Result<String, TransportError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TransportError::Signing(e.to_string()))
    }
}

pub(crate) fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SigningSecret {
        SigningSecret::new("unit-test-secret")
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let issuer = TokenIssuer::new(&secret(), Duration::from_secs(60));
        let token = issuer
            .issue("s-100", "Ravi", Some("ravi@college.edu"), Role::Student)
            .unwrap();

        let identity = JwtVerifier::new(&secret(), 0).verify(&token).await.unwrap();
        assert_eq!(identity.id, "s-100");
        assert_eq!(identity.role(), Some(Role::Student));
        assert_eq!(identity.email.as_deref(), Some("ravi@college.edu"));
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let issuer = TokenIssuer::new(&secret(), Duration::from_secs(60));
        let token = issuer.issue("f-1", "Mei", None, Role::Faculty).unwrap();

        let verifier = JwtVerifier::new(&SigningSecret::new("other-secret"), 0);
        assert_eq!(
            verifier.verify(&token).await,
            Err(VerificationError::InvalidSignature)
        );
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let issuer = TokenIssuer::new(&secret(), Duration::from_secs(60));
        let now = now_epoch_seconds();
        let token = issuer
            .sign(&PortalClaims {
                id: "h-1".into(),
                name: "Old".into(),
                email: None,
                role: "hod".into(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert_eq!(
            JwtVerifier::new(&secret(), 0).verify(&token).await,
            Err(VerificationError::Expired)
        );
    }

    #[tokio::test]
    async fn test_malformed_token_rejected() {
        let verifier = JwtVerifier::new(&secret(), 0);
        assert_eq!(
            verifier.verify("not-a-jwt").await,
            Err(VerificationError::Malformed)
        );
        assert_eq!(verifier.verify("").await, Err(VerificationError::Malformed));
    }

    #[tokio::test]
    async fn test_unknown_role_claim_still_verifies() {
        let issuer = TokenIssuer::new(&secret(), Duration::from_secs(60));
        let now = now_epoch_seconds();
        let token = issuer
            .sign(&PortalClaims {
                id: "x-1".into(),
                name: "Visitor".into(),
                email: None,
                role: "registrar".into(),
                iat: now,
                exp: now + 60,
            })
            .unwrap();

        let identity = JwtVerifier::new(&secret(), 0).verify(&token).await.unwrap();
        assert_eq!(identity.role_claim, "registrar");
        assert_eq!(identity.role(), None);
    }

    #[test]
    fn test_oversized_ttl_is_an_error() {
        let issuer = TokenIssuer::new(&secret(), Duration::from_secs(u64::MAX));
        assert!(matches!(
            issuer.issue("s-1", "Ravi", None, Role::Student),
            Err(TransportError::Signing(_))
        ));

        let issuer = TokenIssuer::new(&secret(), Duration::from_secs(i64::MAX as u64));
        assert!(issuer.issue("s-1", "Ravi", None, Role::Student).is_err());
    }

    #[tokio::test]
    async fn test_missing_role_claim_decodes_empty() {
        let now = now_epoch_seconds();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "id": "u-1", "iat": now, "exp": now + 60 }),
            &secret().encoding_key(),
        )
        .unwrap();

        let identity = JwtVerifier::new(&secret(), 0).verify(&token).await.unwrap();
        assert_eq!(identity.role_claim, "");
        assert_eq!(identity.role(), None);
    }
}
