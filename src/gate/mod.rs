//! Route access gate.
//!
//! Runs in front of every route: classifies the path, reads the token cookies,
//! decides, then either answers directly (redirect, 401, preflight) or lets
//! the request through and decorates the response.

mod decision;
mod headers;
mod path;

pub use decision::{Decision, decide};
pub use headers::{
    PREFLIGHT_MAX_AGE_SECS, apply_cors_headers, apply_preflight_headers, apply_security_headers,
};
pub use path::{PathError, canonical_path};

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

use crate::auth::{ApiAuthError, AuthStateEvaluator, TokenPair};
use crate::routes::{Category, RouteTables};

/// Login page; unauthenticated users land here.
pub const LOGIN_PATH: &str = "/auth/login";

/// Dashboard home; authenticated users land here.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Query parameter carrying the page to return to after login.
pub const REDIRECT_PARAM: &str = "redirect";

/// Immutable per-process gate configuration.
pub struct GateState {
    pub tables: RouteTables,
    pub evaluator: AuthStateEvaluator,
    /// CORS origin for the current deploy environment
    pub allowed_origin: HeaderValue,
}

/// Login URL, with the return path form-encoded when there is one.
pub fn login_location(return_to: Option<&str>) -> String {
    match return_to {
        Some(path) => {
            let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
            format!("{}?{}={}", LOGIN_PATH, REDIRECT_PARAM, encoded)
        }
        None => LOGIN_PATH.to_string(),
    }
}

/// Wrap a router with the gate.
pub fn with_gate(router: Router, gate: Arc<GateState>) -> Router {
    router.layer(middleware::from_fn_with_state(gate, access_gate))
}

/// The gate middleware.
pub async fn access_gate(
    State(gate): State<Arc<GateState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = match canonical_path(request.uri().path()) {
        Ok(path) => path,
        Err(e) => {
            info!(path = %request.uri().path(), error = %e, "Rejected malformed path");
            let mut response = (StatusCode::BAD_REQUEST, "Bad request").into_response();
            apply_security_headers(response.headers_mut());
            return response;
        }
    };
    let categories = gate.tables.classify(&path);
    let tokens = TokenPair::from_headers(request.headers());
    let authenticated = gate.evaluator.is_authenticated(&tokens);
    let decision = decide(request.method(), &path, categories, authenticated);

    debug!(
        method = %request.method(),
        path = %path,
        categories = ?categories.iter().collect::<Vec<_>>(),
        authenticated,
        decision = ?decision,
        "Access decision"
    );

    let is_api = categories.contains(Category::Api);

    match decision {
        Decision::PreflightOk => {
            let mut response = StatusCode::OK.into_response();
            apply_preflight_headers(response.headers_mut(), &gate.allowed_origin);
            response
        }
        Decision::RedirectLogin(return_to) => {
            Redirect::temporary(&login_location(return_to.as_deref())).into_response()
        }
        Decision::RedirectDashboard => Redirect::temporary(DASHBOARD_PATH).into_response(),
        Decision::Unauthorized => {
            info!(path = %path, had_tokens = !tokens.is_empty(), "Rejected unauthenticated API request");
            let mut response = ApiAuthError.into_response();
            apply_security_headers(response.headers_mut());
            apply_cors_headers(response.headers_mut(), &gate.allowed_origin);
            response
        }
        Decision::Next => {
            let mut response = next.run(request).await;
            apply_security_headers(response.headers_mut());
            if is_api {
                apply_cors_headers(response.headers_mut(), &gate.allowed_origin);
            }
            response
        }
    }
}
