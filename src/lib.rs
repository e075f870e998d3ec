pub mod api;
pub mod auth;
pub mod cli;
pub mod gate;
pub mod jwt;
pub mod routes;
pub mod server_config;
pub mod timezone;

use api::{ConfigState, SessionState, create_api_router, create_session_router, health_router};
use auth::AuthStateEvaluator;
use axum::{
    Router,
    http::{HeaderValue, StatusCode},
};
use gate::{GateState, with_gate};
use routes::RouteTables;
use server_config::Environment;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use timezone::ResolvedTimezone;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

pub struct ServerConfig {
    /// Deploy environment (selects CORS origin and cookie Secure flag)
    pub environment: Environment,
    /// CORS origin already selected for `environment`
    pub allowed_origin: HeaderValue,
    /// Authentication strategy, fixed for the process lifetime
    pub evaluator: AuthStateEvaluator,
    /// Route classification tables
    pub routes: RouteTables,
    /// Exported dashboard build served behind the gate
    pub static_dir: Option<PathBuf>,
    /// Display timezone resolved during startup
    pub timezone: ResolvedTimezone,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let pages = match config.static_dir.as_ref() {
        Some(dir) => Router::new().fallback_service(ServeDir::new(dir)),
        None => Router::new().fallback(|| async { (StatusCode::NOT_FOUND, "Not found") }),
    };

    gated_router(config, pages)
}

/// Combine the built-in routes with `pages` and put the gate in front.
pub fn gated_router(config: &ServerConfig, pages: Router) -> Router {
    let secure_cookies = config.environment.secure_cookies();

    let api_router = create_api_router(ConfigState {
        environment: config.environment,
        timezone: config.timezone.name(),
        auth_strategy: config.evaluator.strategy(),
    });

    let session_router = create_session_router(SessionState { secure_cookies });

    let gate = Arc::new(GateState {
        tables: config.routes.clone(),
        evaluator: config.evaluator.clone(),
        allowed_origin: config.allowed_origin.clone(),
    });

    let router = Router::new()
        .nest("/api", api_router)
        .nest("/auth", session_router)
        .merge(health_router())
        .merge(pages);

    with_gate(router, gate)
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app.into_make_service()).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> std::io::Result<(tokio::task::JoinHandle<()>, SocketAddr)> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
