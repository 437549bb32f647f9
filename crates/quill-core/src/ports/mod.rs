//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod metrics;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenKind, TokenService, TokenSubject};
pub use metrics::{NoopRecorder, OperationRecorder, Outcome};
pub use repository::{BaseRepository, CommentRepository, SessionRepository, UserRepository};
