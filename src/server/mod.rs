//! HTTP server
//!
//! Wires the access gate into an axum router: pages go through
//! [`middleware::page_gate`], API routes through [`middleware::require_roles`].

pub mod middleware;
pub mod routes;

pub use middleware::{Caller, RoleGuard, page_gate, require_roles};

use crate::access_control::{AccessGate, Role};
use crate::config::{AppConfig, RedirectConfig};
use crate::error::TransportError;
use axum::{
    Json, Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for gated routes
#[derive(Clone)]
pub struct ServerState {
    pub gate: Arc<AccessGate>,
    pub cookie_name: Arc<str>,
    pub redirects: Arc<RedirectConfig>,
    pub server_name: Arc<str>,
    /// Redirect targets that no grant or public route covers
    ungated: Arc<[String]>,
}

impl ServerState {
    pub fn new(config: &AppConfig, gate: Arc<AccessGate>) -> Self {
        let redirects = &config.redirects;
        let ungated: Vec<String> = [&redirects.login, &redirects.unauthorized]
            .into_iter()
            .filter(|target| gate.policy().is_unreachable(target))
            .cloned()
            .collect();

        Self {
            gate,
            cookie_name: config.auth.cookie_name.as_str().into(),
            redirects: Arc::new(redirects.clone()),
            server_name: config.server.name.as_str().into(),
            ungated: ungated.into(),
        }
    }

    /// Check if a path is a redirect surface served without gating
    ///
    /// Only targets that no role can reach qualify, so skipping the gate
    /// never opens a page some grant protects.
    pub fn serves_ungated(&self, path: &str) -> bool {
        self.ungated.iter().any(|target| target == path)
    }
}

/// Build the application router
pub fn build_router(state: ServerState) -> Router {
    let pages = routes::pages()
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), page_gate));

    let session = Router::new()
        .route("/api/session", get(routes::session))
        .route_layer(from_fn_with_state(
            RoleGuard::new(state.clone(), Role::all()),
            require_roles,
        ));

    let reports = Router::new()
        .route("/api/admin/reports", get(routes::admin_reports))
        .route_layer(from_fn_with_state(
            RoleGuard::new(state.clone(), &[Role::Hod]),
            require_roles,
        ));

    pages
        .merge(session)
        .merge(reports)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}

/// Serve the portal until Ctrl+C
pub async fn run_server(bind: SocketAddr, state: ServerState) -> Result<(), TransportError> {
    let app = build_router(state);

    let listener = TcpListener::bind(bind).await?;
    info!("Campus gate listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal");
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
