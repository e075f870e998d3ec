//! CLI argument parsing, validation, and startup helpers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use tracing::{error, info};
use url::Url;

use crate::auth::{AuthStateEvaluator, AuthStrategy};
use crate::jwt::JwtConfig;
use crate::routes::RouteTables;
use crate::server_config::{CorsOrigins, Environment};
use crate::timezone::TimezoneOptions;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fanzone-gate",
    about = "Route access gate for the fan engagement admin dashboard"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Deploy environment; selects the CORS origin and Secure cookies
    #[arg(short, long, env = "APP_ENV", default_value = "development")]
    pub environment: Environment,

    /// Allowed CORS origin in production (must be https)
    #[arg(long, env = "CORS_PRODUCTION_ORIGIN")]
    pub production_origin: Option<String>,

    /// Allowed CORS origin in development
    #[arg(long, env = "CORS_DEVELOPMENT_ORIGIN", default_value = "http://localhost:3000")]
    pub development_origin: String,

    /// How a request is judged authenticated
    #[arg(long, env = "AUTH_STRATEGY", default_value = "presence")]
    pub auth_strategy: AuthStrategy,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// JSON file with protected/auth_only/public/api pattern lists
    #[arg(long, env = "ROUTES_FILE")]
    pub routes_file: Option<PathBuf>,

    /// Directory with the exported dashboard build
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Display timezone (IANA name, e.g. "Africa/Lagos")
    #[arg(long, env = "DASHBOARD_TIMEZONE")]
    pub timezone: Option<String>,

    /// Endpoint returning {"timezone": "..."} used when no timezone is configured
    #[arg(long, env = "TIMEZONE_LOOKUP_URL")]
    pub timezone_lookup_url: Option<Url>,

    /// Upper bound for the timezone lookup, in milliseconds
    #[arg(long, default_value = "2000")]
    pub timezone_lookup_timeout_ms: u64,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: The runtime's worker threads exist, but no task has been
        // spawned yet, so nothing else reads or writes the environment.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required for the verified strategy. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build the evaluator for the chosen strategy. Only the verified strategy needs a secret.
pub fn build_evaluator(
    strategy: AuthStrategy,
    jwt_secret_file: Option<&str>,
) -> Option<AuthStateEvaluator> {
    let evaluator = match strategy {
        AuthStrategy::Presence => AuthStateEvaluator::presence(),
        AuthStrategy::Verified => {
            let secret = load_jwt_secret(jwt_secret_file)?;
            AuthStateEvaluator::verified(Arc::new(JwtConfig::new(secret.as_bytes())))
        }
    };
    info!(strategy = strategy.as_str(), "Authentication strategy selected");
    Some(evaluator)
}

fn parse_origin(name: &str, value: &str) -> Option<Url> {
    match Url::parse(value) {
        Ok(url) => Some(url),
        Err(e) => {
            error!(origin = %value, error = %e, "Invalid {} URL", name);
            None
        }
    }
}

/// Parse both origins and select the one for `environment`.
/// Returns None and logs an error if validation fails.
pub fn select_allowed_origin(
    environment: Environment,
    production_origin: Option<&str>,
    development_origin: &str,
) -> Option<HeaderValue> {
    let production = match production_origin {
        Some(value) => Some(parse_origin("production-origin", value)?),
        None => None,
    };
    let development = parse_origin("development-origin", development_origin)?;

    let origins = CorsOrigins {
        production,
        development,
    };

    match origins.select(environment) {
        Ok(origin) => {
            info!(environment = ?environment, origin = ?origin, "CORS origin selected");
            Some(origin)
        }
        Err(e) => {
            error!(environment = ?environment, "{}", e);
            None
        }
    }
}

/// Load route tables from file, or use the built-in dashboard defaults.
pub fn load_routes(routes_file: Option<&Path>) -> Option<RouteTables> {
    let Some(path) = routes_file else {
        return Some(RouteTables::default());
    };

    match RouteTables::from_file(path) {
        Ok(tables) => {
            info!(
                path = %path.display(),
                protected = tables.protected.len(),
                auth_only = tables.auth_only.len(),
                public = tables.public.len(),
                api = tables.api.len(),
                "Route tables loaded"
            );
            Some(tables)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to load route tables");
            None
        }
    }
}

/// Check that the static directory exists.
pub fn validate_static_dir(static_dir: Option<PathBuf>) -> Option<Option<PathBuf>> {
    match static_dir {
        Some(dir) if !dir.is_dir() => {
            error!(path = %dir.display(), "Static directory does not exist");
            None
        }
        other => Some(other),
    }
}

pub fn timezone_options(args: &Args) -> TimezoneOptions {
    TimezoneOptions {
        configured: args.timezone.clone(),
        lookup_url: args.timezone_lookup_url.clone(),
        lookup_timeout: Duration::from_millis(args.timezone_lookup_timeout_ms),
    }
}
