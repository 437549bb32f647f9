//! Authentication ports.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which of the two token flavours a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Who a token is issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub session_id: Uuid,
}

/// Claims recovered from a validated token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: TokenSubject,
    pub kind: TokenKind,
    pub exp: i64,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue a token of the given kind for a subject.
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<String, AuthError>;

    /// Validate a token and decode its claims. Tokens of another kind are rejected.
    fn validate(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Session is no longer valid")]
    SessionRevoked,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
