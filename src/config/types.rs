//! Configuration types for campus-gate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::auth::SigningSecret;
use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Credential settings
    pub auth: AuthConfig,

    /// Role grants and public routes
    pub access_control: AccessControlConfig,

    /// Where denied callers are sent
    pub redirects: RedirectConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Server name reported in page responses
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            name: "campus-gate".to_string(),
        }
    }
}

/// Credential configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for HS256 tokens (prefer env var JWT_SECRET)
    pub jwt_secret: Option<SigningSecret>,

    /// Cookie carrying the credential
    pub cookie_name: String,

    /// Lifetime of issued tokens
    pub token_ttl_secs: u64,

    /// Clock skew tolerated when checking `exp`
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            cookie_name: "auth_token".to_string(),
            token_ttl_secs: 24 * 60 * 60,
            leeway_secs: 0,
        }
    }
}

/// Access control configuration
///
/// `roles` maps a role name to its grants. A grant is an exact path
/// (`"/courses"`) or a prefix written with a trailing `/*` (`"/admin/*"`).
/// Declaring `[access_control.roles]` in a file replaces the whole default
/// table; roles left out are denied with `UnknownRole`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessControlConfig {
    /// Paths reachable without a credential
    pub public_routes: Vec<String>,

    /// Grants per role name
    pub roles: HashMap<String, Vec<String>>,
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        let grants = |paths: &[&str]| paths.iter().map(|p| p.to_string()).collect::<Vec<_>>();

        let mut roles = HashMap::new();
        roles.insert(
            "student".to_string(),
            grants(&["/dashboard", "/courses", "/documents", "/materials"]),
        );
        roles.insert(
            "faculty".to_string(),
            grants(&["/dashboard", "/courses", "/documents", "/documents/upload"]),
        );
        roles.insert(
            "hod".to_string(),
            grants(&["/dashboard", "/courses", "/documents", "/admin", "/admin/*"]),
        );

        Self {
            public_routes: grants(&["/login", "/register", "/reset-password"]),
            roles,
        }
    }
}

/// Redirect targets for denied page requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Target for unauthenticated or invalid credentials
    pub login: String,

    /// Target for unknown roles and forbidden paths
    pub unauthorized: String,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            unauthorized: "/unauthorized".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.cookie_name, "auth_token");
        assert_eq!(config.auth.token_ttl_secs, 86_400);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.redirects.login, "/login");
        assert_eq!(config.redirects.unauthorized, "/unauthorized");
    }

    #[test]
    fn test_default_roles_cover_every_role() {
        let config = AccessControlConfig::default();
        assert_eq!(config.roles.len(), 3);
        for grants in config.roles.values() {
            assert!(!grants.is_empty());
        }
        assert!(config.roles["hod"].contains(&"/admin/*".to_string()));
        assert!(!config.roles["student"].contains(&"/documents/upload".to_string()));
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }
}
