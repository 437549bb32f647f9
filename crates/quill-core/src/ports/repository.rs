use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, CommentFilter, CommentPatch, NewComment, Session, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Session repository.
#[async_trait]
pub trait SessionRepository: BaseRepository<Session, Uuid> {
    /// All sessions of a user that are still valid.
    async fn find_valid_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, RepoError>;
}

/// Comment store. Identifiers and timestamps are assigned by the store.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, input: NewComment) -> Result<Comment, RepoError>;

    async fn find_one(&self, filter: &CommentFilter) -> Result<Option<Comment>, RepoError>;

    /// Matching comments, newest first.
    async fn find_many(&self, filter: &CommentFilter) -> Result<Vec<Comment>, RepoError>;

    /// Apply a patch to the first match and return the updated record.
    async fn update_one(
        &self,
        filter: &CommentFilter,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, RepoError>;

    /// Remove at most one matching record. Returns the number removed.
    async fn delete_one(&self, filter: &CommentFilter) -> Result<u64, RepoError>;
}
