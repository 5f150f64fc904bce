//! Access control module
//!
//! Role-based route gating for the college portal.
//!
//! ## Access Control Model
//!
//! Each role (`student`, `faculty`, `hod`) owns a list of grants. A grant is
//! either an exact path or a prefix pattern ending in `/*`, which covers the
//! base path and everything nested under it. Any matching grant allows the
//! request; there are no deny rules. Public routes bypass the table entirely.
//!
//! ## Example Configuration
//!
//! ```toml
//! [access_control]
//! public_routes = ["/login", "/register", "/reset-password"]
//!
//! [access_control.roles]
//! student = ["/dashboard", "/courses", "/documents", "/materials"]
//! faculty = ["/dashboard", "/courses", "/documents", "/documents/upload"]
//! hod = ["/dashboard", "/courses", "/documents", "/admin", "/admin/*"]
//! ```

pub mod gate;
pub mod patterns;
pub mod table;
pub mod types;

pub use gate::{AccessDecision, AccessGate, AccessPolicy, DenyReason, Evaluation};
pub use patterns::{PathPattern, PatternSet};
pub use table::PermissionTable;
pub use types::{Identity, Role};
