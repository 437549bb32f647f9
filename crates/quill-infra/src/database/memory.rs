//! In-memory stores - used when no DATABASE_URL is configured and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, CommentFilter, CommentPatch, NewComment, Session, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, SessionRepository, UserRepository};

/// Comment store backed by a vector kept in insertion order.
pub struct InMemoryCommentRepository {
    store: RwLock<Vec<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, input: NewComment) -> Result<Comment, RepoError> {
        let comment = Comment::new(input);
        self.store.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn find_one(&self, filter: &CommentFilter) -> Result<Option<Comment>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|c| c.matches(filter)).cloned())
    }

    async fn find_many(&self, filter: &CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;

        // Later inserts are newer, so walking backwards yields newest first
        // even when two timestamps collide.
        Ok(store
            .iter()
            .rev()
            .filter(|c| c.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_one(
        &self,
        filter: &CommentFilter,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, RepoError> {
        let mut store = self.store.write().await;

        Ok(store.iter_mut().find(|c| c.matches(filter)).map(|comment| {
            comment.apply(patch);
            comment.clone()
        }))
    }

    async fn delete_one(&self, filter: &CommentFilter) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;

        let Some(index) = store.iter().position(|c| c.matches(filter)) else {
            return Ok(0);
        };
        let removed = store.remove(index);

        // Mirrors ON DELETE SET NULL on the parent reference.
        for reply in store
            .iter_mut()
            .filter(|c| c.parent_comment == Some(removed.id))
        {
            reply.parent_comment = None;
        }

        Ok(1)
    }
}

/// User store keyed by ID. Emails are unique.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store
            .values()
            .any(|u| u.email == entity.email && u.id != entity.id)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on email: {}",
                entity.email
            )));
        }

        store.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }
}

/// Session store keyed by ID.
pub struct InMemorySessionRepository {
    store: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Session, Uuid> for InMemorySessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Session) -> Result<Session, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_valid_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, RepoError> {
        let store = self.store.read().await;

        let mut sessions: Vec<Session> = store
            .values()
            .filter(|s| s.user_id == user_id && s.valid)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(sessions)
    }
}
