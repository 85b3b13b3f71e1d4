use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use model::entities::user::UserRole;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Claims carried by every bearer token: the user's identity, role and
/// expiration timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub role: UserRole,
    pub exp: usize,
}

/// Token verification failures, each mapped to a distinct caller-visible
/// error code by the middleware.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token format")]
    Malformed,
    #[error("Token not yet valid")]
    NotYetValid,
    #[error("Invalid or malformed token")]
    Invalid,
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Expired => "TOKEN_EXPIRED",
            TokenError::Malformed => "TOKEN_MALFORMED",
            TokenError::NotYetValid => "TOKEN_NOT_YET_VALID",
            TokenError::Invalid => "TOKEN_INVALID",
        }
    }
}

/// Handler for token issuance and verification
pub struct JwtHandler {
    secret: String,
    expiration_hours: i64,
}

impl std::fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtHandler")
            .field("expiration_hours", &self.expiration_hours)
            .finish_non_exhaustive()
    }
}

impl JwtHandler {
    /// Create a new handler with the server-held secret. Tokens expire
    /// after one day.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_hours: 24,
        }
    }

    /// Create a handler with a custom expiration window.
    pub fn with_expiration_hours(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }

    /// Issue a signed token embedding the user's id and role.
    pub fn issue_token(&self, user_id: i32, role: UserRole) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(chrono::Duration::hours(self.expiration_hours))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            id: user_id,
            role,
            exp: expiration,
        };

        debug!(
            "Issuing token for user {} ({}), expires in {}h",
            user_id,
            role.as_str(),
            self.expiration_hours
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to generate token")
    }

    /// Verify a token and extract its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            _ => TokenError::Invalid,
        })?;

        debug!("Validated token for user {}", decoded.claims.id);

        Ok(decoded.claims)
    }
}
