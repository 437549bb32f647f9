//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenClaims, TokenKind, TokenService, TokenSubject};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            issuer: "quill-api".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 365,
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        // Warn if using default secret in production
        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            access_ttl_minutes: std::env::var("ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.access_ttl_minutes),
            refresh_ttl_days: std::env::var("REFRESH_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.refresh_ttl_days),
        }
    }

    fn ttl(&self, kind: TokenKind) -> TimeDelta {
        match kind {
            TokenKind::Access => TimeDelta::minutes(self.access_ttl_minutes),
            TokenKind::Refresh => TimeDelta::days(self.refresh_ttl_days),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    email: String,
    name: String,
    session: String, // session_id
    kind: TokenKind,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

/// HS256 token service issuing access and refresh tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, AuthError> {
    Uuid::parse_str(value).map_err(|e| AuthError::InvalidToken(e.to_string()))
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + self.config.ttl(kind);

        let claims = Claims {
            sub: subject.user_id.to_string(),
            email: subject.email.clone(),
            name: subject.name.clone(),
            session: subject.session_id.to_string(),
            kind,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;
        let claims = token_data.claims;

        if claims.kind != kind {
            return Err(AuthError::InvalidToken(format!(
                "expected {kind:?} token, got {:?}",
                claims.kind
            )));
        }

        Ok(TokenClaims {
            subject: TokenSubject {
                user_id: parse_uuid(&claims.sub)?,
                email: claims.email,
                name: claims.name,
                session_id: parse_uuid(&claims.session)?,
            },
            kind: claims.kind,
            exp: claims.exp,
        })
    }
}
