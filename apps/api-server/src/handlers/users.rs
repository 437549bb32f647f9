//! User registration handler.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::services::RegisterUser;
use quill_shared::dto::{RegisterUserRequest, UserResponse};

use crate::extract::ValidatedJson;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// POST /api/users
pub async fn create_user(
    state: web::Data<AppState>,
    body: ValidatedJson<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if !req.passwords_match() {
        return Err(AppError::field(
            "passwordConfirmation",
            "Passwords do not match",
        ));
    }

    let user = state
        .users
        .register(RegisterUser {
            email: req.email.unwrap_or_default(),
            name: req.name.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        })
        .await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}
