//! Deploy environment and the CORS origin it selects.
//!
//! Resolved once at startup and handed to the gate; nothing here is mutated
//! after the server starts.

use axum::http::HeaderValue;
use serde::Serialize;
use url::Url;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Production deployments run behind HTTPS, so cookies are marked Secure.
    pub fn secure_cookies(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// The two configured CORS origins.
#[derive(Debug, Clone)]
pub struct CorsOrigins {
    pub production: Option<Url>,
    pub development: Url,
}

/// Errors selecting the allowed origin.
#[derive(Debug, PartialEq, Eq)]
pub enum OriginError {
    MissingProductionOrigin,
    InsecureProductionOrigin,
    NotAnOrigin(String),
}

impl std::fmt::Display for OriginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OriginError::MissingProductionOrigin => write!(
                f,
                "A production origin is required in production. Set CORS_PRODUCTION_ORIGIN or use --production-origin"
            ),
            OriginError::InsecureProductionOrigin => {
                write!(f, "Production origin must use HTTPS")
            }
            OriginError::NotAnOrigin(url) => write!(f, "Not a usable origin: {}", url),
        }
    }
}

impl std::error::Error for OriginError {}

impl CorsOrigins {
    /// Pick the origin for `environment` and render it as a header value
    /// (scheme, host and port only).
    pub fn select(&self, environment: Environment) -> Result<HeaderValue, OriginError> {
        let url = match environment {
            Environment::Production => {
                let url = self
                    .production
                    .as_ref()
                    .ok_or(OriginError::MissingProductionOrigin)?;
                if url.scheme() != "https" {
                    return Err(OriginError::InsecureProductionOrigin);
                }
                url
            }
            Environment::Development => &self.development,
        };

        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(OriginError::NotAnOrigin(url.to_string()));
        }

        HeaderValue::from_str(&origin.ascii_serialization())
            .map_err(|_| OriginError::NotAnOrigin(url.to_string()))
    }
}
