//! Portal routes
//!
//! Page rendering lives elsewhere; these handlers only report which page was
//! reached and by whom, so the gate can be exercised end to end.

use crate::access_control::Identity;
use crate::server::ServerState;
use crate::server::middleware::Caller;
use axum::{
    Extension, Json, Router,
    extract::State,
    http::Uri,
    routing::get,
};
use serde::Serialize;

/// Body returned by page handlers
#[derive(Debug, Serialize)]
pub struct PageBody {
    pub server: String,
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

/// Navigable portal pages
pub fn pages() -> Router<ServerState> {
    Router::new()
        .route("/login", get(page))
        .route("/register", get(page))
        .route("/reset-password", get(page))
        .route("/unauthorized", get(page))
        .route("/dashboard", get(page))
        .route("/courses", get(page))
        .route("/courses/{id}", get(page))
        .route("/documents", get(page))
        .route("/documents/upload", get(page))
        .route("/materials", get(page))
        .route("/admin", get(page))
        .route("/admin/{*rest}", get(page))
}

async fn page(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    uri: Uri,
) -> Json<PageBody> {
    Json(PageBody {
        server: state.server_name.to_string(),
        page: uri.path().to_string(),
        user: caller.0,
    })
}

/// `GET /api/session`: the verified identity of the caller
pub async fn session(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub requested_by: String,
    pub roles: Vec<String>,
}

/// `GET /api/admin/reports`: department-head summary of the active grants
pub async fn admin_reports(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Json<ReportSummary> {
    let mut roles: Vec<String> = state
        .gate
        .table()
        .roles()
        .map(|role| role.to_string())
        .collect();
    roles.sort();

    Json(ReportSummary {
        requested_by: identity.id,
        roles,
    })
}
