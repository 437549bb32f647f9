//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::AuthError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
