//! Cookie-backed token store.
//!
//! The gate never writes tokens, it only reads them from the `Cookie` header and,
//! on logout or an API 401, tells the browser to expire both of them together.

use axum::http::{HeaderMap, HeaderValue, header};

/// Cookie name for the access token (short-lived).
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Cookie name for the refresh token (long-lived).
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// The access/refresh pair as presented by the browser.
///
/// Both halves are independent: either may be missing. Empty cookie values
/// count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    access: Option<String>,
    refresh: Option<String>,
}

impl TokenPair {
    pub fn new(access: Option<String>, refresh: Option<String>) -> Self {
        Self {
            access: access.filter(|t| !t.is_empty()),
            refresh: refresh.filter(|t| !t.is_empty()),
        }
    }

    /// Read both tokens from the request cookies.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(
            get_cookie(headers, ACCESS_COOKIE_NAME).map(str::to_owned),
            get_cookie(headers, REFRESH_COOKIE_NAME).map(str::to_owned),
        )
    }

    pub fn access(&self) -> Option<&str> {
        self.access.as_deref()
    }

    pub fn refresh(&self) -> Option<&str> {
        self.refresh.as_deref()
    }

    /// Presence check only: true iff both tokens are present and non-empty.
    pub fn has_valid_token_pair(&self) -> bool {
        self.access.is_some() && self.refresh.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

fn expired_cookie(name: &str, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}",
        name, secure
    )
}

/// `Set-Cookie` values that expire both tokens at once.
pub fn clear_token_cookies(secure: bool) -> [String; 2] {
    [
        expired_cookie(ACCESS_COOKIE_NAME, secure),
        expired_cookie(REFRESH_COOKIE_NAME, secure),
    ]
}

/// Append the clearing `Set-Cookie` headers to a response header map.
pub fn append_clear_cookies(headers: &mut HeaderMap, secure: bool) {
    for cookie in clear_token_cookies(secure) {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}
