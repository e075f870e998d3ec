#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, Response, StatusCode},
    routing::get,
};
use chrono_tz::Tz;
use fanzone_gate::{
    ServerConfig,
    auth::AuthStateEvaluator,
    create_app, gated_router,
    jwt::{JwtConfig, TokenClaims, TokenType},
    routes::RouteTables,
    server_config::Environment,
    timezone::{ResolvedTimezone, TimezoneSource},
};
use jsonwebtoken::{EncodingKey, Header};

pub const JWT_SECRET: &[u8] = b"integration-test-secret-32-bytes!!";
pub const DEV_ORIGIN: &str = "http://localhost:3000";

/// Builder for test apps with various options
pub struct TestApp {
    evaluator: AuthStateEvaluator,
    environment: Environment,
    routes: RouteTables,
    static_dir: Option<PathBuf>,
}

impl TestApp {
    pub fn presence() -> Self {
        Self {
            evaluator: AuthStateEvaluator::presence(),
            environment: Environment::Development,
            routes: RouteTables::default(),
            static_dir: None,
        }
    }

    pub fn verified() -> Self {
        Self {
            evaluator: AuthStateEvaluator::verified(Arc::new(JwtConfig::new(JWT_SECRET))),
            ..Self::presence()
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_routes(mut self, routes: RouteTables) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.static_dir = Some(dir);
        self
    }

    pub fn config(self) -> ServerConfig {
        let allowed_origin = match self.environment {
            Environment::Development => HeaderValue::from_static(DEV_ORIGIN),
            Environment::Production => HeaderValue::from_static("https://admin.fanzone.example"),
        };
        ServerConfig {
            environment: self.environment,
            allowed_origin,
            evaluator: self.evaluator,
            routes: self.routes,
            static_dir: self.static_dir,
            timezone: ResolvedTimezone {
                tz: Tz::Africa__Lagos,
                source: TimezoneSource::Configured,
            },
        }
    }

    /// The gate in front of stub pages that echo their own path.
    pub fn build(self) -> Router {
        let config = self.config();
        gated_router(&config, stub_pages())
    }

    /// The production router: gate in front of the static file server.
    pub fn build_app(self) -> Router {
        create_app(&self.config())
    }
}

/// A throwaway exported dashboard build. Removed on drop.
pub struct StaticSite {
    pub dir: PathBuf,
}

impl StaticSite {
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "fanzone_gate_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::remove_dir_all(&dir).ok();
        for (page, body) in [
            ("dashboard/index.html", "dashboard build"),
            ("about/index.html", "about build"),
        ] {
            let file = dir.join(page);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, body).unwrap();
        }
        Self { dir }
    }
}

impl Drop for StaticSite {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

fn stub_pages() -> Router {
    Router::new()
        .route("/about", get(|| async { "about page" }))
        .route("/dashboard", get(|| async { "dashboard page" }))
        .route("/auth/login", get(|| async { "login page" }))
        .route(
            "/api/protected/users",
            get(|| async { "[]" }).post(|| async { StatusCode::CREATED }),
        )
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Sign a token the way the backend would. `ttl_secs` may be negative for expired tokens.
pub fn mint_token(token_type: TokenType, ttl_secs: i64) -> String {
    let now = now();
    let claims = TokenClaims {
        sub: Some("fan-admin-1".to_string()),
        exp: (now as i64 + ttl_secs) as u64,
        iat: Some(now),
        token_type: Some(token_type),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .unwrap()
}

pub fn auth_cookies(access_token: &str, refresh_token: &str) -> String {
    format!(
        "access_token={}; refresh_token={}",
        access_token, refresh_token
    )
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Extract Set-Cookie headers from response
pub fn extract_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// Check if cookies contain a token being cleared (Max-Age=0)
pub fn has_cleared_cookie(cookies: &[String], cookie_name: &str) -> bool {
    cookies
        .iter()
        .any(|c| c.starts_with(&format!("{}=;", cookie_name)) && c.contains("Max-Age=0"))
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_security_headers(response: &Response<Body>) {
    assert_eq!(header(response, "x-frame-options"), Some("DENY"));
    assert_eq!(header(response, "x-content-type-options"), Some("nosniff"));
    assert_eq!(
        header(response, "referrer-policy"),
        Some("strict-origin-when-cross-origin")
    );
}
