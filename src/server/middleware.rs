//! Request gating middleware
//!
//! Two layers sit in front of handlers:
//! - [`page_gate`] runs the access gate for navigable pages and redirects
//!   denied callers to the login or unauthorized surface.
//! - [`require_roles`] guards API routes with an explicit role list and
//!   answers with JSON status codes instead of redirects.

use crate::access_control::{AccessDecision, Identity, Role};
use crate::server::ServerState;
use crate::util::normalize_path;
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Verified caller attached to gated page requests
///
/// `None` on public pages reached without a credential.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<Identity>);

/// Read a named cookie from the request headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Read a bearer token from the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Gate navigable pages
pub async fn page_gate(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = normalize_path(request.uri().path());

    // Redirect surfaces stay reachable so a denied caller cannot loop
    if state.serves_ungated(&path) {
        request.extensions_mut().insert(Caller(None));
        return next.run(request).await;
    }

    let credential = cookie_value(request.headers(), &state.cookie_name);
    let evaluation = state
        .gate
        .evaluate_with_identity(credential.as_deref(), &path)
        .await;

    match evaluation.decision {
        AccessDecision::Allow => {
            request
                .extensions_mut()
                .insert(Caller(evaluation.identity));
            next.run(request).await
        }
        AccessDecision::Deny(reason) => {
            let target = if reason.requires_login() {
                state.redirects.login.as_str()
            } else {
                state.redirects.unauthorized.as_str()
            };
            debug!(path = %path, reason = %reason, target, "Redirecting denied request");
            Redirect::to(target).into_response()
        }
    }
}

/// State for [`require_roles`]
#[derive(Clone)]
pub struct RoleGuard {
    state: ServerState,
    allowed: Arc<[Role]>,
}

impl RoleGuard {
    pub fn new(state: ServerState, allowed: &[Role]) -> Self {
        Self {
            state,
            allowed: allowed.into(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

fn json_status(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Guard an API route by role
///
/// The credential comes from the cookie or a bearer header. The verified
/// [`Identity`] is attached as a request extension.
pub async fn require_roles(
    State(guard): State<RoleGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let credential =
        cookie_value(headers, &guard.state.cookie_name).or_else(|| bearer_token(headers));

    let Some(credential) = credential else {
        return json_status(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let identity = match guard.state.gate.authenticate(&credential).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!(path = %request.uri().path(), error = %e, "Rejected API credential");
            return json_status(StatusCode::UNAUTHORIZED, "Invalid token");
        }
    };

    if !identity.role().is_some_and(|role| guard.allows(role)) {
        warn!(
            path = %request.uri().path(),
            user = %identity.id,
            role = %identity.role_claim,
            "Role not permitted for API route"
        );
        return json_status(StatusCode::FORBIDDEN, "Forbidden");
    }

    request.extensions_mut().insert(identity);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=abc.def.ghi; lang=en"),
        );
        assert_eq!(
            cookie_value(&headers, "auth_token"),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("auth_token=xyz"));
        assert_eq!(cookie_value(&headers, "auth_token"), Some("xyz".to_string()));
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token="));
        assert_eq!(cookie_value(&headers, "auth_token"), None);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok123"),
        );
        assert_eq!(bearer_token(&headers), Some("tok123".to_string()));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(bearer_token(&headers), None);
    }
}
