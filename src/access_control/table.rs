//! Per-role permission table

use crate::access_control::gate::{AccessDecision, DenyReason};
use crate::access_control::patterns::PatternSet;
use crate::access_control::types::Role;
use crate::config::AccessControlConfig;
use crate::error::ConfigError;
use std::collections::HashMap;
use tracing::trace;

/// Compiled mapping from role to its grants
///
/// Built once at startup and never mutated. Every role present maps to a
/// non-empty pattern set; a role that is absent is denied.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    roles: HashMap<Role, PatternSet>,
}

impl PermissionTable {
    /// Compile the table from configuration
    pub fn new(config: &AccessControlConfig) -> Result<Self, ConfigError> {
        let mut roles = HashMap::with_capacity(config.roles.len());

        for (name, patterns) in &config.roles {
            let role = Role::try_parse(name).ok_or_else(|| ConfigError::UnknownRole(name.clone()))?;
            let set = PatternSet::new(patterns)?;
            if set.is_empty() {
                return Err(ConfigError::EmptyRole(name.clone()));
            }
            roles.insert(role, set);
        }

        Ok(Self { roles })
    }

    /// Grants for a role, if the role has an entry
    pub fn patterns_for(&self, role: Role) -> Option<&PatternSet> {
        self.roles.get(&role)
    }

    /// Roles that have an entry
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.keys().copied()
    }

    /// Check if any role holds a grant covering the path
    pub fn grants_any(&self, path: &str) -> bool {
        self.roles.values().any(|patterns| patterns.matches(path))
    }

    /// Decide whether a role may open a normalized path
    pub fn check(&self, role: Role, path: &str) -> AccessDecision {
        let Some(patterns) = self.patterns_for(role) else {
            return AccessDecision::Deny(DenyReason::UnknownRole);
        };

        match patterns.find_match(path) {
            Some(pattern) => {
                trace!(role = %role, path, pattern = %pattern, "Matched grant");
                AccessDecision::Allow
            }
            None => AccessDecision::Deny(DenyReason::Forbidden),
        }
    }
}
