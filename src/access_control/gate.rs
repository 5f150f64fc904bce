//! Access gate
//!
//! Decides, for an optional credential and a normalized request path, whether
//! the request may proceed. Evaluation order:
//! 1. Public routes are allowed without a credential
//! 2. A missing credential is `Unauthenticated`
//! 3. A credential the verifier rejects is `InvalidCredential`
//! 4. A role claim with no table entry is `UnknownRole`
//! 5. A path no grant covers is `Forbidden`
//!
//! The gate holds no mutable state and can be shared across request tasks.

use crate::access_control::table::PermissionTable;
use crate::access_control::types::Identity;
use crate::auth::SharedVerifier;
use crate::config::AccessControlConfig;
use crate::error::{ConfigError, VerificationError};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// No credential on a non-public path
    Unauthenticated,
    /// Credential failed verification (malformed, expired, bad signature)
    InvalidCredential,
    /// Role claim is unrecognized or has no table entry
    UnknownRole,
    /// No grant covers the path
    Forbidden,
}

impl DenyReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::InvalidCredential => "invalid_credential",
            DenyReason::UnknownRole => "unknown_role",
            DenyReason::Forbidden => "forbidden",
        }
    }

    /// Whether the caller should be sent back to sign in
    pub const fn requires_login(&self) -> bool {
        matches!(
            self,
            DenyReason::Unauthenticated | DenyReason::InvalidCredential
        )
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Request proceeds
    Allow,
    /// Request is rejected
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Deny(_))
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::Deny(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDecision::Allow => f.write_str("allow"),
            AccessDecision::Deny(reason) => write!(f, "deny ({})", reason),
        }
    }
}

/// Decision plus the identity it was made for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: AccessDecision,
    /// Present whenever the credential verified
    pub identity: Option<Identity>,
}

impl Evaluation {
    fn anonymous(decision: AccessDecision) -> Self {
        Self {
            decision,
            identity: None,
        }
    }
}

/// Credential-free half of the gate: public routes plus the role table
///
/// Used on its own for offline checks where no token is presented.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    table: PermissionTable,
    public_routes: HashSet<String>,
}

impl AccessPolicy {
    /// Build a policy from configuration
    pub fn new(config: &AccessControlConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_table(
            PermissionTable::new(config)?,
            config.public_routes.iter().cloned(),
        ))
    }

    pub fn with_table(table: PermissionTable, public_routes: impl IntoIterator<Item = String>) -> Self {
        Self {
            table,
            public_routes: public_routes.into_iter().collect(),
        }
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// Check if a path is reachable without a credential
    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.contains(path)
    }

    /// Check if no caller at all can reach a path: not public, no grant
    pub fn is_unreachable(&self, path: &str) -> bool {
        !self.is_public(path) && !self.table.grants_any(path)
    }

    /// Evaluate a request for an identity that is already verified
    pub fn evaluate_identity(&self, identity: &Identity, path: &str) -> AccessDecision {
        if self.is_public(path) {
            return AccessDecision::Allow;
        }

        let decision = match identity.role() {
            Some(role) => self.table.check(role, path),
            None => AccessDecision::Deny(DenyReason::UnknownRole),
        };

        match decision {
            AccessDecision::Allow => {
                debug!(path, user = %identity.id, role = %identity.role_claim, "Access granted");
            }
            AccessDecision::Deny(reason) => {
                info!(
                    path,
                    user = %identity.id,
                    role = %identity.role_claim,
                    reason = %reason,
                    "Access denied"
                );
            }
        }

        decision
    }
}

/// Route access gate
pub struct AccessGate {
    policy: AccessPolicy,
    verifier: SharedVerifier,
}

impl AccessGate {
    /// Build a gate from configuration
    pub fn new(config: &AccessControlConfig, verifier: SharedVerifier) -> Result<Self, ConfigError> {
        Ok(Self::with_policy(AccessPolicy::new(config)?, verifier))
    }

    /// Build a gate from an already compiled table
    pub fn with_table(
        table: PermissionTable,
        public_routes: impl IntoIterator<Item = String>,
        verifier: SharedVerifier,
    ) -> Self {
        Self::with_policy(AccessPolicy::with_table(table, public_routes), verifier)
    }

    pub fn with_policy(policy: AccessPolicy, verifier: SharedVerifier) -> Self {
        Self { policy, verifier }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn table(&self) -> &PermissionTable {
        self.policy.table()
    }

    /// Check if a path is reachable without a credential
    pub fn is_public(&self, path: &str) -> bool {
        self.policy.is_public(path)
    }

    /// Resolve a credential through the verifier
    pub async fn authenticate(&self, credential: &str) -> Result<Identity, VerificationError> {
        self.verifier.verify(credential).await
    }

    /// Evaluate a request
    pub async fn evaluate(&self, credential: Option<&str>, path: &str) -> AccessDecision {
        self.evaluate_with_identity(credential, path).await.decision
    }

    /// Evaluate a request, keeping the verified identity when there is one
    pub async fn evaluate_with_identity(
        &self,
        credential: Option<&str>,
        path: &str,
    ) -> Evaluation {
        debug!(path, has_credential = credential.is_some(), "Evaluating access");

        if self.is_public(path) {
            return Evaluation::anonymous(AccessDecision::Allow);
        }

        let Some(credential) = credential else {
            info!(path, reason = %DenyReason::Unauthenticated, "Access denied");
            return Evaluation::anonymous(AccessDecision::Deny(DenyReason::Unauthenticated));
        };

        let identity = match self.authenticate(credential).await {
            Ok(identity) => identity,
            Err(e) => {
                info!(
                    path,
                    reason = %DenyReason::InvalidCredential,
                    error = %e,
                    verifier = self.verifier.verifier_type(),
                    "Access denied"
                );
                return Evaluation::anonymous(AccessDecision::Deny(
                    DenyReason::InvalidCredential,
                ));
            }
        };

        Evaluation {
            decision: self.evaluate_identity(&identity, path),
            identity: Some(identity),
        }
    }

    /// Evaluate a request for an identity that is already verified
    pub fn evaluate_identity(&self, identity: &Identity, path: &str) -> AccessDecision {
        self.policy.evaluate_identity(identity, path)
    }
}
