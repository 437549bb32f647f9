//! In-process test doubles for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, CommentFilter, CommentPatch, NewComment, Session, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, CommentRepository, OperationRecorder, Outcome, PasswordService,
    SessionRepository, TokenClaims, TokenKind, TokenService, TokenSubject, UserRepository,
};

#[derive(Default)]
pub struct FakeCommentRepository {
    rows: Mutex<Vec<Comment>>,
    fail_next: AtomicBool,
}

impl FakeCommentRepository {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RepoError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for FakeCommentRepository {
    async fn insert(&self, input: NewComment) -> Result<Comment, RepoError> {
        self.check()?;
        let comment = Comment::new(input);
        self.rows.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn find_one(&self, filter: &CommentFilter) -> Result<Option<Comment>, RepoError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.matches(filter)).cloned())
    }

    async fn find_many(&self, filter: &CommentFilter) -> Result<Vec<Comment>, RepoError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        // Insertion order is creation order, so reversing gives newest first.
        Ok(rows.iter().rev().filter(|c| c.matches(filter)).cloned().collect())
    }

    async fn update_one(
        &self,
        filter: &CommentFilter,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, RepoError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|c| c.matches(filter)).map(|c| {
            c.apply(patch);
            c.clone()
        }))
    }

    async fn delete_one(&self, filter: &CommentFilter) -> Result<u64, RepoError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter().position(|c| c.matches(filter)) {
            Some(index) => {
                rows.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[derive(Default)]
pub struct RecordingRecorder {
    samples: Mutex<Vec<(&'static str, Outcome)>>,
}

impl RecordingRecorder {
    pub fn samples(&self) -> Vec<(&'static str, Outcome)> {
        self.samples.lock().unwrap().clone()
    }
}

impl OperationRecorder for RecordingRecorder {
    fn record(&self, operation: &'static str, outcome: Outcome, _elapsed: Duration) {
        self.samples.lock().unwrap().push((operation, outcome));
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    rows: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        self.rows.lock().unwrap().insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|u| u.email == email).cloned())
    }
}

#[derive(Default)]
pub struct FakeSessionRepository {
    rows: Mutex<HashMap<Uuid, Session>>,
}

#[async_trait]
impl BaseRepository<Session, Uuid> for FakeSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, entity: Session) -> Result<Session, RepoError> {
        self.rows.lock().unwrap().insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl SessionRepository for FakeSessionRepository {
    async fn find_valid_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|s| s.user_id == user_id && s.valid)
            .cloned()
            .collect())
    }
}

/// Plain-text "hashing" so tests stay fast.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

/// Tokens of the form `kind|user|session|email|name`.
pub struct FakeTokens;

impl FakeTokens {
    fn encode(subject: &TokenSubject, kind: TokenKind) -> String {
        let kind = match kind {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        };
        format!(
            "{kind}|{}|{}|{}|{}",
            subject.user_id, subject.session_id, subject.email, subject.name
        )
    }
}

impl TokenService for FakeTokens {
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<String, AuthError> {
        Ok(Self::encode(subject, kind))
    }

    fn validate(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AuthError> {
        let parts: Vec<&str> = token.split('|').collect();
        let [token_kind, user_id, session_id, email, name] = parts[..] else {
            return Err(AuthError::InvalidToken("malformed".to_string()));
        };
        let expected = match kind {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        };
        if token_kind != expected {
            return Err(AuthError::InvalidToken("wrong kind".to_string()));
        }
        let parse = |s: &str| Uuid::parse_str(s).map_err(|e| AuthError::InvalidToken(e.to_string()));
        Ok(TokenClaims {
            subject: TokenSubject {
                user_id: parse(user_id)?,
                session_id: parse(session_id)?,
                email: email.to_string(),
                name: name.to_string(),
            },
            kind,
            exp: 0,
        })
    }
}
