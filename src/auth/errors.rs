//! Authentication error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// 401 for API callers. Cookies are left alone; clearing them is the
/// client's job (or `/auth/logout`).
#[derive(Debug, Clone, Copy)]
pub struct ApiAuthError;

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: &'static str,
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized",
                message: "Authentication required",
            }),
        )
            .into_response()
    }
}
