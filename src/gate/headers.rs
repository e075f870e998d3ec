//! Security and CORS response headers.

use axum::http::{HeaderMap, HeaderValue, header};

/// How long browsers may cache a preflight answer (24 hours).
pub const PREFLIGHT_MAX_AGE_SECS: u32 = 86400;

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

/// Headers added to every non-redirect response.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    // Prevent embedding in iframes
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    // Prevent MIME sniffing
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
}

/// CORS headers for API responses. `allowed_origin` is picked once at startup
/// from the deploy environment.
pub fn apply_cors_headers(headers: &mut HeaderMap, allowed_origin: &HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed_origin.clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

/// Everything a preflight answer carries.
pub fn apply_preflight_headers(headers: &mut HeaderMap, allowed_origin: &HeaderValue) {
    apply_security_headers(headers);
    apply_cors_headers(headers, allowed_origin);
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from(PREFLIGHT_MAX_AGE_SECS),
    );
}
