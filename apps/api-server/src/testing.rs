//! Shared fixtures for handler and middleware tests.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::domain::{Session, User};
use quill_core::ports::{BaseRepository, TokenKind, TokenService, TokenSubject};
use quill_infra::{
    Argon2PasswordService, InMemoryCommentRepository, InMemorySessionRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService,
};

use crate::state::{AppState, Stores};

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key".to_string(),
        issuer: "quill-test".to_string(),
        access_ttl_minutes: 15,
        refresh_ttl_days: 1,
    }
}

/// A stored user with an open session and a token pair.
pub struct SignedIn {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub subject: TokenSubject,
    pub access_token: String,
    pub refresh_token: String,
}

impl SignedIn {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.access_token))
    }
}

/// App state over in-memory stores, with handles on the stores themselves.
pub struct TestContext {
    pub state: AppState,
    pub comments: Arc<InMemoryCommentRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub tokens: Arc<JwtTokenService>,
}

impl TestContext {
    pub fn new() -> Self {
        let comments = Arc::new(InMemoryCommentRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let tokens = Arc::new(JwtTokenService::new(jwt_config()));

        let stores = Stores {
            comments: comments.clone(),
            users: users.clone(),
            sessions: sessions.clone(),
        };

        #[cfg(feature = "metrics")]
        let state = {
            let metrics = Arc::new(quill_infra::DatabaseMetrics::new().unwrap());
            let recorder: Arc<dyn quill_core::ports::OperationRecorder> = metrics.clone();
            let mut state = AppState::build(
                stores,
                tokens.clone(),
                Arc::new(Argon2PasswordService::new()),
                recorder,
            );
            state.metrics = Some(metrics);
            state
        };

        #[cfg(not(feature = "metrics"))]
        let state = AppState::build(
            stores,
            tokens.clone(),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(quill_core::ports::NoopRecorder),
        );

        Self {
            state,
            comments,
            users,
            sessions,
            tokens,
        }
    }

    /// Store a user and a valid session directly, skipping password hashing.
    pub async fn signed_in(&self, email: &str) -> SignedIn {
        let user = self
            .users
            .save(User::new(
                email.to_string(),
                "Test User".to_string(),
                "unused".to_string(),
            ))
            .await
            .unwrap();
        let session = self
            .sessions
            .save(Session::new(user.id, "test-agent".to_string()))
            .await
            .unwrap();

        let subject = TokenSubject {
            user_id: user.id,
            email: user.email,
            name: user.name,
            session_id: session.id,
        };

        SignedIn {
            user_id: subject.user_id,
            session_id: session.id,
            access_token: self.tokens.issue(&subject, TokenKind::Access).unwrap(),
            refresh_token: self.tokens.issue(&subject, TokenKind::Refresh).unwrap(),
            subject,
        }
    }
}

/// Initialise the full application over a [`TestContext`].
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::middleware::auth::ResolveIdentity)
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .configure($crate::handlers::configure_routes),
        )
        .await
    };
}

pub(crate) use test_app;
