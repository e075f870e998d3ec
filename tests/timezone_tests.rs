//! Tests for the startup timezone lookup against an in-process server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::get};
use chrono_tz::Tz;
use fanzone_gate::timezone::{
    TimezoneError, TimezoneOptions, TimezoneSource, lookup_timezone, resolve_timezone,
    system_default,
};
use tokio::net::TcpListener;
use url::Url;

/// Serve `router` on a random local port and return its base URL.
async fn spawn_lookup_server(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    Url::parse(&format!("http://{}/tz", addr)).unwrap()
}

fn responding(zone: &'static str) -> Router {
    Router::new().route(
        "/tz",
        get(move || async move { Json(serde_json::json!({ "timezone": zone })) }),
    )
}

#[tokio::test]
async fn test_lookup_success() {
    let url = spawn_lookup_server(responding("America/Sao_Paulo")).await;

    let tz = lookup_timezone(&url, Duration::from_secs(2)).await.unwrap();
    assert_eq!(tz, Tz::America__Sao_Paulo);
}

#[tokio::test]
async fn test_resolve_uses_lookup_when_not_configured() {
    let url = spawn_lookup_server(responding("Europe/Madrid")).await;
    let options = TimezoneOptions {
        configured: None,
        lookup_url: Some(url),
        lookup_timeout: Duration::from_secs(2),
    };

    let resolved = resolve_timezone(&options).await;
    assert_eq!(resolved.tz, Tz::Europe__Madrid);
    assert_eq!(resolved.source, TimezoneSource::Lookup);
}

#[tokio::test]
async fn test_configured_skips_lookup() {
    let url = spawn_lookup_server(responding("Europe/Madrid")).await;
    let options = TimezoneOptions {
        configured: Some("Africa/Cairo".to_string()),
        lookup_url: Some(url),
        lookup_timeout: Duration::from_secs(2),
    };

    let resolved = resolve_timezone(&options).await;
    assert_eq!(resolved.tz, Tz::Africa__Cairo);
    assert_eq!(resolved.source, TimezoneSource::Configured);
}

#[tokio::test]
async fn test_slow_lookup_times_out() {
    let router = Router::new().route(
        "/tz",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(serde_json::json!({ "timezone": "Asia/Tokyo" }))
        }),
    );
    let url = spawn_lookup_server(router).await;

    let started = std::time::Instant::now();
    let result = lookup_timezone(&url, Duration::from_millis(200)).await;

    assert!(matches!(result, Err(TimezoneError::Timeout)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_slow_lookup_falls_back_to_system_default() {
    let router = Router::new().route(
        "/tz",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let url = spawn_lookup_server(router).await;
    let options = TimezoneOptions {
        configured: None,
        lookup_url: Some(url),
        lookup_timeout: Duration::from_millis(200),
    };

    let resolved = resolve_timezone(&options).await;
    assert_eq!(resolved.source, TimezoneSource::SystemDefault);
    assert_eq!(resolved.tz, system_default());
}

#[tokio::test]
async fn test_unknown_zone_from_lookup() {
    let url = spawn_lookup_server(responding("Atlantis/Capital")).await;

    let result = lookup_timezone(&url, Duration::from_secs(2)).await;
    assert!(matches!(result, Err(TimezoneError::UnknownZone(_))));
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let router = Router::new().route("/tz", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let url = spawn_lookup_server(router).await;

    let result = lookup_timezone(&url, Duration::from_secs(2)).await;
    assert!(matches!(result, Err(TimezoneError::Request(_))));

    let options = TimezoneOptions {
        configured: None,
        lookup_url: Some(url),
        lookup_timeout: Duration::from_secs(2),
    };
    assert_eq!(
        resolve_timezone(&options).await.source,
        TimezoneSource::SystemDefault
    );
}
