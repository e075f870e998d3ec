//! Public configuration endpoint.
//!
//! The dashboard front-end reads its display timezone here instead of looking
//! it up itself.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::AuthStrategy;
use crate::server_config::Environment;

/// Version embedded at compile time from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct ConfigState {
    pub environment: Environment,
    pub timezone: &'static str,
    pub auth_strategy: AuthStrategy,
}

#[derive(Serialize)]
struct ConfigResponse {
    environment: Environment,
    timezone: &'static str,
    auth_strategy: &'static str,
    version: &'static str,
}

pub fn router(state: Arc<ConfigState>) -> Router {
    Router::new().route("/", get(get_config)).with_state(state)
}

async fn get_config(State(state): State<Arc<ConfigState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        environment: state.environment,
        timezone: state.timezone,
        auth_strategy: state.auth_strategy.as_str(),
        version: VERSION,
    })
}
