//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CommentRepository, NoopRecorder, OperationRecorder, PasswordService, SessionRepository,
    TokenService, UserRepository,
};
use quill_core::services::{CommentService, SessionService, UserService};
use quill_infra::{
    Argon2PasswordService, InMemoryCommentRepository, InMemorySessionRepository,
    InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use anyhow::Context;
#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use quill_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresCommentRepository, PostgresSessionRepository, PostgresUserRepository,
};

#[cfg(feature = "metrics")]
use quill_infra::DatabaseMetrics;

use crate::config::AppConfig;

/// The three record stores behind the services.
pub struct Stores {
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            comments: Arc::new(InMemoryCommentRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        Self {
            comments: Arc::new(PostgresCommentRepository::new(connections.main.clone())),
            users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
            sessions: Arc::new(PostgresSessionRepository::new(connections.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub comments: CommentService,
    pub users: UserService,
    pub sessions: SessionService,
    pub tokens: Arc<dyn TokenService>,
    #[cfg(feature = "metrics")]
    pub metrics: Option<Arc<DatabaseMetrics>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let stores = match &config.database {
            #[cfg(feature = "postgres")]
            Some(db_config) => {
                let connections = DatabaseConnections::init(db_config)
                    .await
                    .context("failed to connect to database")?;
                Migrator::up(&connections.main, None)
                    .await
                    .context("failed to apply migrations")?;
                Stores::postgres(&connections)
            }
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::warn!(
                    "DATABASE_URL is set but the postgres feature is disabled. Using in-memory stores."
                );
                Stores::in_memory()
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Stores::in_memory()
            }
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "metrics")]
        let state = {
            let metrics = if config.metrics_enabled {
                Some(Arc::new(DatabaseMetrics::new()?))
            } else {
                None
            };
            let recorder: Arc<dyn OperationRecorder> = match &metrics {
                Some(metrics) => metrics.clone(),
                None => Arc::new(NoopRecorder),
            };

            Self {
                metrics,
                ..Self::build(stores, tokens, passwords, recorder)
            }
        };

        #[cfg(not(feature = "metrics"))]
        let state = Self::build(stores, tokens, passwords, Arc::new(NoopRecorder));

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Wire services over the given stores. The metrics endpoint stays off.
    pub fn build(
        stores: Stores,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        recorder: Arc<dyn OperationRecorder>,
    ) -> Self {
        Self {
            comments: CommentService::new(stores.comments, recorder),
            users: UserService::new(stores.users.clone(), passwords.clone()),
            sessions: SessionService::new(stores.users, stores.sessions, tokens.clone(), passwords),
            tokens,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }
}
