//! Cookie token store and the authentication check.
//!
//! Tokens are issued by the backend and held by the browser. The gate reads
//! them, judges them under one startup-selected [`AuthStrategy`], and clears
//! them when it answers an API call with 401.

mod cookie;
mod errors;
mod state;

pub use cookie::{
    ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, TokenPair, append_clear_cookies,
    clear_token_cookies, get_cookie,
};
pub use errors::ApiAuthError;
pub use state::{AuthStateEvaluator, AuthStrategy};
