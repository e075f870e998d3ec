//! Access decision table.

use axum::http::Method;

use crate::routes::{Category, CategorySet};

/// Outcome of the gate for one request. Computed fresh every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the request to the downstream handler.
    Next,
    /// Send the user to the login page, optionally remembering where they were going.
    RedirectLogin(Option<String>),
    RedirectDashboard,
    /// API caller without credentials: JSON 401, not a redirect.
    Unauthorized,
    /// CORS preflight answered by the gate itself.
    PreflightOk,
}

/// Apply the precedence table. First matching rule wins:
///
/// 1. `OPTIONS` is always a preflight.
/// 2. An unclassified `/` goes to the dashboard or the login page.
/// 3. Protected and unauthenticated: login, carrying the original path.
/// 4. Auth-only and authenticated: dashboard.
/// 5. API and unauthenticated: 401.
/// 6. Everything else passes through.
pub fn decide(method: &Method, path: &str, categories: CategorySet, authenticated: bool) -> Decision {
    if *method == Method::OPTIONS {
        return Decision::PreflightOk;
    }

    if path == "/" && categories.is_empty() {
        return if authenticated {
            Decision::RedirectDashboard
        } else {
            Decision::RedirectLogin(None)
        };
    }

    if categories.contains(Category::Protected) && !authenticated {
        return Decision::RedirectLogin(Some(path.to_string()));
    }

    if categories.contains(Category::AuthOnly) && authenticated {
        return Decision::RedirectDashboard;
    }

    if categories.contains(Category::Api) && !authenticated {
        return Decision::Unauthorized;
    }

    Decision::Next
}
