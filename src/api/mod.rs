mod config;
mod session;

use axum::{Router, routing::get};
use std::sync::Arc;

pub use config::ConfigState;
pub use session::SessionState;

/// Routes under `/api`.
pub fn create_api_router(config_state: ConfigState) -> Router {
    Router::new().nest("/config", config::router(Arc::new(config_state)))
}

/// Routes under `/auth` served by the gate itself.
pub fn create_session_router(session_state: SessionState) -> Router {
    session::router(session_state)
}

/// Liveness probe.
pub fn health_router() -> Router {
    Router::new().route("/healthz", get(|| async { "ok" }))
}
