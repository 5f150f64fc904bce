//! Campus Gate
//!
//! Role-based route access control for a college management portal with
//! student, faculty and department-head (`hod`) views.
//!
//! ## Features
//!
//! - **Typed grants**: roles are a closed enum, grants are `Exact` or `Prefix` patterns
//! - **Fail closed**: missing, invalid or unrecognized credentials are always denied
//! - **Pluggable verification** behind the [`auth::TokenVerifier`] trait, HS256 JWT by default
//! - **axum middleware** for page redirects and JSON role guards on API routes
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Decision Order
//!
//! ```text
//! public route → credential present → credential verifies → role known → grant matches
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [auth]
//! # secret from JWT_SECRET env var
//! cookie_name = "auth_token"
//!
//! [access_control.roles]
//! student = ["/dashboard", "/courses", "/documents", "/materials"]
//! hod = ["/dashboard", "/admin", "/admin/*"]
//! ```

pub mod access_control;
pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod util;

// Re-export main types
pub use access_control::{AccessDecision, AccessGate, DenyReason, Identity, Role};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use server::{ServerState, build_router};
