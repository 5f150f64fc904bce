//! Access control types
//!
//! Core types used by the access gate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access class of a portal user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Faculty,
    /// Head of department
    Hod,
}

impl Role {
    /// Get the role name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Hod => "hod",
        }
    }

    /// Try to parse a role from its lowercase name
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "faculty" => Some(Role::Faculty),
            "hod" => Some(Role::Hod),
            _ => None,
        }
    }

    /// Get all roles
    pub fn all() -> &'static [Role] {
        &[Role::Student, Role::Faculty, Role::Hod]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verified caller identity
///
/// The role claim is kept exactly as presented by the credential. A claim
/// that names no known role still yields an identity; the gate turns it into
/// an `UnknownRole` denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "role")]
    pub role_claim: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role_claim: role.as_str().to_string(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The typed role, if the claim names one
    pub fn role(&self) -> Option<Role> {
        Role::try_parse(&self.role_claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in Role::all() {
            let parsed = Role::try_parse(role.as_str()).unwrap();
            assert_eq!(*role, parsed);
        }
    }

    #[test]
    fn test_role_parse_is_case_sensitive() {
        assert_eq!(Role::try_parse("HOD"), None);
        assert_eq!(Role::try_parse("admin"), None);
        assert_eq!(Role::try_parse(""), None);
    }

    #[test]
    fn test_identity_role() {
        let identity = Identity::new("u1", "Asha", Role::Faculty);
        assert_eq!(identity.role(), Some(Role::Faculty));

        let identity = Identity {
            role_claim: "janitor".into(),
            ..identity
        };
        assert_eq!(identity.role(), None);
    }

    #[test]
    fn test_identity_serializes_role_field() {
        let identity = Identity::new("u1", "Asha", Role::Hod).with_email("asha@college.edu");
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["role"], "hod");
        assert_eq!(json["email"], "asha@college.edu");
    }
}
