//! Display timezone for the dashboard.
//!
//! Resolved exactly once during startup and injected into whatever needs it.
//! The optional network lookup is bounded by a timeout; every failure falls back
//! to the system default.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

/// Default bound on the lookup request.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2000);

/// Where the resolved timezone came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezoneSource {
    Configured,
    Lookup,
    SystemDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTimezone {
    pub tz: Tz,
    pub source: TimezoneSource,
}

impl ResolvedTimezone {
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }
}

#[derive(Debug, Clone)]
pub struct TimezoneOptions {
    /// Explicit IANA zone name
    pub configured: Option<String>,
    /// Endpoint answering `{"timezone": "<IANA name>"}`
    pub lookup_url: Option<Url>,
    pub lookup_timeout: Duration,
}

impl Default for TimezoneOptions {
    fn default() -> Self {
        Self {
            configured: None,
            lookup_url: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub enum TimezoneError {
    Timeout,
    Request(reqwest::Error),
    UnknownZone(String),
}

impl std::fmt::Display for TimezoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimezoneError::Timeout => write!(f, "Timezone lookup timed out"),
            TimezoneError::Request(e) => write!(f, "Timezone lookup failed: {}", e),
            TimezoneError::UnknownZone(name) => write!(f, "Unknown timezone: {}", name),
        }
    }
}

impl std::error::Error for TimezoneError {}

/// Parse an IANA zone name, tolerating surrounding whitespace and the
/// leading ':' POSIX allows in `TZ`.
pub fn parse_zone(name: &str) -> Result<Tz, TimezoneError> {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_prefix(':').unwrap_or(trimmed);
    trimmed
        .parse::<Tz>()
        .map_err(|_| TimezoneError::UnknownZone(name.to_string()))
}

/// The machine's own zone: `TZ`, then `/etc/timezone`, then UTC.
pub fn system_default() -> Tz {
    if let Ok(tz) = std::env::var("TZ") {
        if let Ok(zone) = parse_zone(&tz) {
            return zone;
        }
    }
    if let Ok(content) = std::fs::read_to_string("/etc/timezone") {
        if let Ok(zone) = parse_zone(&content) {
            return zone;
        }
    }
    Tz::UTC
}

#[derive(Deserialize)]
struct LookupResponse {
    timezone: String,
}

/// Ask a remote endpoint for the zone. Bounded by `timeout` end to end.
pub async fn lookup_timezone(url: &Url, timeout: Duration) -> Result<Tz, TimezoneError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(TimezoneError::Request)?;

    let request = async {
        let response = client.get(url.clone()).send().await?.error_for_status()?;
        response.json::<LookupResponse>().await
    };

    let body = tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| TimezoneError::Timeout)?
        .map_err(|e| {
            if e.is_timeout() {
                TimezoneError::Timeout
            } else {
                TimezoneError::Request(e)
            }
        })?;

    parse_zone(&body.timezone)
}

/// Resolve the display timezone: configured, else looked up, else system default.
pub async fn resolve_timezone(options: &TimezoneOptions) -> ResolvedTimezone {
    if let Some(name) = options.configured.as_deref() {
        match parse_zone(name) {
            Ok(tz) => {
                return finish(tz, TimezoneSource::Configured);
            }
            Err(e) => warn!(error = %e, "Ignoring configured timezone"),
        }
    }

    if let Some(url) = options.lookup_url.as_ref() {
        match lookup_timezone(url, options.lookup_timeout).await {
            Ok(tz) => return finish(tz, TimezoneSource::Lookup),
            Err(e) => warn!(url = %url, error = %e, "Falling back to system timezone"),
        }
    }

    finish(system_default(), TimezoneSource::SystemDefault)
}

fn finish(tz: Tz, source: TimezoneSource) -> ResolvedTimezone {
    info!(timezone = %tz.name(), source = ?source, "Display timezone resolved");
    ResolvedTimezone { tz, source }
}
