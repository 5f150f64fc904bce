//! Campus Gate
//!
//! Role-based route access control for a college management portal.

use campus_gate::{
    access_control::{AccessDecision, AccessGate, AccessPolicy, Identity, Role},
    auth::{create_issuer, create_verifier},
    config::{AppConfig, LogFormat, load_config, load_offline_config},
    error::ConfigError,
    server::{ServerState, run_server},
    util::normalize_path,
};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Campus Gate - role-based access control for the college portal
#[derive(Parser, Debug)]
#[command(name = "campus-gate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CAMPUS_GATE_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CAMPUS_GATE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the gated portal (default)
    Serve {
        /// Bind host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a signed token for local testing
    IssueToken {
        #[arg(long)]
        id: String,

        /// student, faculty or hod
        #[arg(long)]
        role: String,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// Evaluate the permission table for a role and path
    Check {
        /// student, faculty or hod
        #[arg(long)]
        role: String,

        path: String,
    },
}

fn init_logging(config: &AppConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn parse_role(name: &str) -> anyhow::Result<Role> {
    Role::try_parse(name).ok_or_else(|| {
        anyhow::anyhow!("unknown role '{}', expected student, faculty or hod", name)
    })
}

/// Evaluate a role against a path with the configured public routes and table
fn check_access(
    config: &AppConfig,
    role: Role,
    path: &str,
) -> Result<(String, AccessDecision), ConfigError> {
    let policy = AccessPolicy::new(&config.access_control)?;
    let path = normalize_path(path);
    let identity = Identity::new("cli", "", role);
    let decision = policy.evaluate_identity(&identity, &path);
    Ok((path, decision))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let command = args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    // Offline checks verify no credential, so no secret is needed
    let config = match command {
        Command::Check { .. } => load_offline_config(args.config.as_deref())?,
        _ => load_config(args.config.as_deref())?,
    };
    init_logging(&config, args.log_level.as_deref());

    match command {
        Command::Serve { host, port } => {
            info!(version = env!("CARGO_PKG_VERSION"), "Starting campus gate");

            let verifier = create_verifier(&config.auth)
                .inspect_err(|e| error!(error = %e, "Failed to create token verifier"))?;

            let gate = Arc::new(
                AccessGate::new(&config.access_control, verifier)
                    .inspect_err(|e| error!(error = %e, "Failed to build access gate"))?,
            );

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind: SocketAddr = format!("{}:{}", host, port).parse()?;

            run_server(bind, ServerState::new(&config, gate)).await?;
        }
        Command::IssueToken {
            id,
            role,
            name,
            email,
        } => {
            let role = parse_role(&role)?;
            let issuer = create_issuer(&config.auth)?;
            let token = issuer.issue(&id, &name, email.as_deref(), role)?;
            println!("{}", token);
        }
        Command::Check { role, path } => {
            let role = parse_role(&role)?;
            let (path, decision) = check_access(&config, role, &path)?;
            println!("{} {} -> {}", role, path, decision);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_gate::access_control::DenyReason;
    use campus_gate::config::load_config_from_str;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Student, "/materials", AccessDecision::Allow)]
    #[case(Role::Student, "/documents/upload", AccessDecision::Deny(DenyReason::Forbidden))]
    #[case(Role::Faculty, "/documents/upload/", AccessDecision::Allow)]
    #[case(Role::Hod, "//admin//reports", AccessDecision::Allow)]
    #[case(Role::Student, "/register", AccessDecision::Allow)]
    fn test_check_access(#[case] role: Role, #[case] path: &str, #[case] expected: AccessDecision) {
        let (_, decision) = check_access(&AppConfig::default(), role, path).unwrap();
        assert_eq!(decision, expected);
    }

    #[test]
    fn test_check_access_normalizes_path() {
        let (path, _) = check_access(&AppConfig::default(), Role::Hod, "/admin/reports/?x=1").unwrap();
        assert_eq!(path, "/admin/reports");
    }

    #[test]
    fn test_check_access_without_secret() {
        let config = load_config_from_str(
            r#"
[access_control]
public_routes = ["/help"]

[access_control.roles]
student = ["/dashboard"]
"#,
        )
        .unwrap();
        assert!(config.auth.jwt_secret.is_none());

        let (_, decision) = check_access(&config, Role::Faculty, "/help").unwrap();
        assert!(decision.is_allowed());
        let (_, decision) = check_access(&config, Role::Faculty, "/dashboard").unwrap();
        assert_eq!(decision, AccessDecision::Deny(DenyReason::UnknownRole));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("hod").unwrap(), Role::Hod);
        assert!(parse_role("dean").is_err());
    }

    #[test]
    fn test_check_subcommand_args() {
        let args = Args::try_parse_from(["campus-gate", "check", "--role", "student", "/x"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Check { ref role, ref path }) if role == "student" && path == "/x"
        ));
    }
}
