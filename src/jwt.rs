//! JWT validation for the tokens issued by the backend.
//!
//! The gate never mints tokens. It only checks the HS256 signature and expiry
//! against the shared secret.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Token type for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims the gate cares about. Anything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id)
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<u64>,
    /// Token type, when the backend includes one
    #[serde(default, rename = "type", alias = "typ")]
    pub token_type: Option<TokenType>,
}

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    decoding_key: DecodingKey,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    fn decode(&self, token: &str, expected: TokenType) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(JwtError::Decoding)?;

        match token_data.claims.token_type {
            Some(actual) if actual != expected => Err(JwtError::WrongTokenType),
            _ => Ok(token_data.claims),
        }
    }

    /// Validate and decode an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.decode(token, TokenType::Access)
    }

    /// Validate and decode a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.decode(token, TokenType::Refresh)
    }

    /// Boolean form of validation. Failures are logged, never returned.
    pub fn verify(&self, token: &str, expected: TokenType) -> bool {
        match self.decode(token, expected) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(token_type = ?expected, error = %e, "Token rejected");
                false
            }
        }
    }
}

/// Errors that can occur during JWT validation.
#[derive(Debug)]
pub enum JwtError {
    /// Bad signature, malformed token, or expired
    Decoding(jsonwebtoken::errors::Error),
    /// Wrong token type (e.g., using refresh token as access token)
    WrongTokenType,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::WrongTokenType => write!(f, "Wrong token type"),
        }
    }
}

impl std::error::Error for JwtError {}
