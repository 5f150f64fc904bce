//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (CAMPUS_GATE_*, plus JWT_SECRET)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::access_control::{PathPattern, Role};
use crate::access_control::patterns::is_normalized;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "campus-gate.toml",
    ".campus-gate.toml",
    "~/.config/campus-gate/config.toml",
    "/etc/campus-gate/config.toml",
];

/// Longest lifetime accepted for issued tokens (one year)
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Load configuration from a TOML string (useful for testing)
///
/// Does not require a JWT secret.
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config_relaxed(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let app_config = load_layered(config_path)?;
    validate_config(&app_config)?;
    Ok(app_config)
}

/// Load configuration for offline table checks
///
/// Same sources as [`load_config`], but a JWT secret is not required since
/// no credential is verified.
pub fn load_offline_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let app_config = load_layered(config_path)?;
    validate_config_relaxed(&app_config)?;
    Ok(app_config)
}

fn load_layered(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g. CAMPUS_GATE_SERVER__PORT -> server.port
    builder = builder.add_source(
        Environment::with_prefix("CAMPUS_GATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        builder = builder
            .set_override("auth.jwt_secret", secret)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))
}

/// Validate configuration values (relaxed - for testing without a secret)
fn validate_config_relaxed(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    if config.auth.token_ttl_secs == 0 || config.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
        return Err(ConfigError::Invalid {
            message: format!(
                "auth.token_ttl_secs must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            ),
        });
    }

    if config.auth.cookie_name.is_empty() {
        return Err(ConfigError::Missing {
            field: "auth.cookie_name".to_string(),
        });
    }

    validate_route(&config.redirects.login, "redirects.login")?;
    validate_route(&config.redirects.unauthorized, "redirects.unauthorized")?;

    for route in &config.access_control.public_routes {
        validate_route(route, "access_control.public_routes")?;
    }

    validate_roles(config)?;

    Ok(())
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let has_secret = config
        .auth
        .jwt_secret
        .as_ref()
        .is_some_and(|s| !s.is_blank());

    if !has_secret {
        return Err(ConfigError::Missing {
            field: "auth.jwt_secret (set JWT_SECRET environment variable)".to_string(),
        });
    }

    validate_config_relaxed(config)
}

/// Every role name must be known and carry at least one valid pattern
fn validate_roles(config: &AppConfig) -> Result<(), ConfigError> {
    for (name, patterns) in &config.access_control.roles {
        if Role::try_parse(name).is_none() {
            return Err(ConfigError::UnknownRole(name.clone()));
        }
        if patterns.is_empty() {
            return Err(ConfigError::EmptyRole(name.clone()));
        }
        for pattern in patterns {
            PathPattern::parse(pattern).map_err(|e| match e {
                ConfigError::InvalidPattern { pattern, reason } => ConfigError::InvalidPattern {
                    pattern,
                    reason: format!("in access_control.roles.{}: {}", name, reason),
                },
                other => other,
            })?;
        }
    }
    Ok(())
}

fn validate_route(route: &str, field_path: &str) -> Result<(), ConfigError> {
    if !route.starts_with('/') {
        return Err(ConfigError::Invalid {
            message: format!("{} entries must start with '/', got: {}", field_path, route),
        });
    }
    if !is_normalized(route) {
        return Err(ConfigError::Invalid {
            message: format!(
                "{} entries must be normalized paths (no trailing '/' or '//'), got: {}",
                field_path, route
            ),
        });
    }
    Ok(())
}
