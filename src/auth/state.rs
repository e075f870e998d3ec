//! The single "is this request authenticated" decision.

use std::sync::Arc;

use super::cookie::TokenPair;
use crate::jwt::{JwtConfig, TokenType};

/// How authentication is judged. Chosen once at startup.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Both cookies present and non-empty. No signature check.
    #[default]
    Presence,
    /// A valid access token, or a valid refresh token the client can trade in.
    Verified,
}

impl AuthStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::Verified => "verified",
        }
    }
}

/// Evaluates a [`TokenPair`] under the configured strategy.
#[derive(Clone)]
pub enum AuthStateEvaluator {
    Presence,
    Verified(Arc<JwtConfig>),
}

impl AuthStateEvaluator {
    pub fn presence() -> Self {
        Self::Presence
    }

    pub fn verified(jwt: Arc<JwtConfig>) -> Self {
        Self::Verified(jwt)
    }

    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Self::Presence => AuthStrategy::Presence,
            Self::Verified(_) => AuthStrategy::Verified,
        }
    }

    pub fn is_authenticated(&self, tokens: &TokenPair) -> bool {
        match self {
            Self::Presence => tokens.has_valid_token_pair(),
            Self::Verified(jwt) => {
                // An expired access token is fine while the refresh token holds.
                tokens
                    .access()
                    .is_some_and(|t| jwt.verify(t, TokenType::Access))
                    || tokens
                        .refresh()
                        .is_some_and(|t| jwt.verify(t, TokenType::Refresh))
            }
        }
    }
}
