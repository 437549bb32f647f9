//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to create a comment.
///
/// Carries no author field; the author is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(
        required(message = "Content is required"),
        length(min = 1, message = "Content should not be empty")
    )]
    pub content: Option<String>,

    #[validate(required(message = "Post Slug is required"))]
    pub post_slug: Option<String>,

    pub parent_comment: Option<String>,
}

/// Request to edit a comment.
///
/// Same shape as [`CreateCommentRequest`]. `post_slug` must be present but its
/// value is never applied; post slug and author cannot change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(
        required(message = "Content is required"),
        length(min = 1, message = "Content should not be empty")
    )]
    pub content: Option<String>,

    #[validate(required(message = "Post Slug is required"))]
    pub post_slug: Option<String>,
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(required(message = "Name is required"))]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "Not a valid email")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 6, message = "Password too short - should be 6 chars minimum")
    )]
    pub password: Option<String>,

    #[validate(required(message = "Password confirmation is required"))]
    pub password_confirmation: Option<String>,
}

impl RegisterUserRequest {
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }
}

/// Request to open a session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(required(message = "Email is required"))]
    pub email: Option<String>,

    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

/// A comment as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    pub user: Uuid,
    pub post_slug: String,
    pub parent_comment: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub valid: bool,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Token pair. Both are `null` after logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokensResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}
