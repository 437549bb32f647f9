//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use quill_core::error::{DomainError, RepoError};
use quill_core::ports::AuthError;
use quill_shared::{ErrorResponse, FieldError};

/// Application-level error type that converts to RFC 7807 responses.
///
/// `NotFound` and `Forbidden` come out of the comment gates and carry no body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation errors: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn field(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden | AppError::AuthenticationRequired => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound | AppError::Forbidden => {
                return HttpResponse::build(self.status_code()).finish();
            }
            AppError::AuthenticationRequired => ErrorResponse::forbidden()
                .with_detail("A valid access token is required for this resource."),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound,
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            DomainError::Repo(err) => err.into(),
            DomainError::Auth(err) => err.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) => AppError::Internal(msg),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

#[cfg(feature = "metrics")]
impl From<quill_infra::MetricsError> for AppError {
    fn from(err: quill_infra::MetricsError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
