//! Logout: expire both token cookies and go back to the login page.

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tracing::info;

use crate::auth::append_clear_cookies;
use crate::gate::LOGIN_PATH;

#[derive(Clone, Copy)]
pub struct SessionState {
    pub secure_cookies: bool,
}

pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/logout", get(logout).post(logout))
        .with_state(state)
}

async fn logout(State(state): State<SessionState>) -> Response {
    info!("Clearing session cookies");
    let mut response = Redirect::temporary(LOGIN_PATH).into_response();
    append_clear_cookies(response.headers_mut(), state.secure_cookies);
    response
}
