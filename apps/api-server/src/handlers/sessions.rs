//! Session handlers: login, list, logout.

use actix_web::{HttpRequest, HttpResponse, http::header, web};

use quill_core::domain::Session;
use quill_shared::dto::{CreateSessionRequest, SessionResponse, SessionTokensResponse};

use crate::extract::ValidatedJson;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn session_response(session: Session) -> SessionResponse {
    SessionResponse {
        id: session.id,
        user: session.user_id,
        valid: session.valid,
        user_agent: session.user_agent,
        created_at: session.created_at,
        updated_at: session.updated_at,
    }
}

/// POST /api/sessions
pub async fn create_session(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: ValidatedJson<CreateSessionRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let tokens = state
        .sessions
        .login(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
            user_agent,
        )
        .await?;

    Ok(HttpResponse::Ok().json(SessionTokensResponse {
        access_token: Some(tokens.access_token),
        refresh_token: Some(tokens.refresh_token),
    }))
}

/// GET /api/sessions - the caller's valid sessions.
pub async fn get_sessions(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let sessions = state.sessions.list_valid(identity.user_id).await?;
    let body: Vec<SessionResponse> = sessions.into_iter().map(session_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/sessions - log the current session out.
pub async fn delete_session(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    state.sessions.invalidate(identity.session_id).await?;

    Ok(HttpResponse::Ok().json(SessionTokensResponse {
        access_token: None,
        refresh_token: None,
    }))
}
