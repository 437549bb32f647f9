//! Login sessions and token issuance.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Session, User};
use crate::error::DomainError;
use crate::ports::{
    AuthError, PasswordService, SessionRepository, TokenKind, TokenService, TokenSubject,
    UserRepository,
};

/// Token pair handed out on login.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            passwords,
        }
    }

    /// Verify credentials, open a session and issue an access/refresh token pair.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        user_agent: &str,
    ) -> Result<SessionTokens, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(DomainError::InvalidCredentials);
        }

        let session = self
            .sessions
            .save(Session::new(user.id, user_agent.to_string()))
            .await?;
        let subject = subject_for(&user, session.id);

        tracing::info!(user_id = %user.id, session_id = %session.id, "Session created");

        Ok(SessionTokens {
            access_token: self.tokens.issue(&subject, TokenKind::Access)?,
            refresh_token: self.tokens.issue(&subject, TokenKind::Refresh)?,
        })
    }

    pub async fn list_valid(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError> {
        Ok(self.sessions.find_valid_by_user(user_id).await?)
    }

    /// Log a session out. Its refresh token stops working immediately.
    pub async fn invalidate(&self, session_id: Uuid) -> Result<Session, DomainError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Session",
                id: session_id,
            })?;

        let session = self.sessions.save(session.invalidate()).await?;
        tracing::info!(session_id = %session.id, "Session invalidated");
        Ok(session)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token's session must still exist and be valid, and its user
    /// must still exist.
    pub async fn reissue_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<(String, TokenSubject), DomainError> {
        let claims = self.tokens.validate(refresh_token, TokenKind::Refresh)?;
        let session_id = claims.subject.session_id;

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .filter(|s| s.valid)
            .ok_or(AuthError::SessionRevoked)?;

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id: session.user_id,
            })?;

        let subject = subject_for(&user, session.id);
        let token = self.tokens.issue(&subject, TokenKind::Access)?;
        tracing::debug!(session_id = %session.id, "Access token reissued");
        Ok((token, subject))
    }
}

fn subject_for(user: &User, session_id: Uuid) -> TokenSubject {
    TokenSubject {
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        session_id,
    }
}
