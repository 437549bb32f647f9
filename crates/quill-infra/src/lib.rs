//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the comment/user/session stores, token and password
//! services, and the metrics recorder.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL stores via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `metrics` - Prometheus histogram for store response times

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "metrics")]
pub mod metrics;

// Re-exports - In-Memory
pub use database::{InMemoryCommentRepository, InMemorySessionRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "metrics")]
pub use metrics::{DatabaseMetrics, MetricsError};
