//! Authentication middleware and extractors.
//!
//! [`ResolveIdentity`] runs on every request. It reads the bearer access
//! token and, when the token has expired and an `x-refresh` header is
//! present, swaps the refresh token for a new access token returned in the
//! `x-access-token` response header. A request whose credentials cannot be
//! resolved continues anonymously; handlers that need a caller take an
//! [`Identity`], which answers 403 when there is none.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap, HeaderName, HeaderValue},
    web,
};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenKind, TokenSubject};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Request header carrying the refresh token.
pub const REFRESH_HEADER: &str = "x-refresh";

/// Response header carrying a reissued access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

impl From<TokenSubject> for Identity {
    fn from(subject: TokenSubject) -> Self {
        Self {
            user_id: subject.user_id,
            session_id: subject.session_id,
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or(AppError::AuthenticationRequired),
        )
    }
}

/// Middleware that attaches the caller's [`Identity`] to the request.
pub struct ResolveIdentity;

impl<S, B> Transform<S, ServiceRequest> for ResolveIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = ResolveIdentityService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResolveIdentityService {
            service: Rc::new(service),
        }))
    }
}

pub struct ResolveIdentityService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ResolveIdentityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let mut reissued = None;

            match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => {
                    if let Some((identity, token)) = resolve(&state, req.headers()).await {
                        req.extensions_mut().insert(identity);
                        reissued = token;
                    }
                }
                None => tracing::error!("AppState not found in app data"),
            }

            let mut res = service.call(req).await?;

            if let Some(token) = reissued {
                match HeaderValue::from_str(&token) {
                    Ok(value) => {
                        res.headers_mut()
                            .insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), value);
                    }
                    Err(e) => tracing::warn!(error = %e, "Reissued token is not a valid header"),
                }
            }

            Ok(res)
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Identity for the request plus a freshly issued access token, if one was needed.
async fn resolve(state: &AppState, headers: &HeaderMap) -> Option<(Identity, Option<String>)> {
    let token = bearer_token(headers)?;

    match state.tokens.validate(token, TokenKind::Access) {
        Ok(claims) => Some((claims.subject.into(), None)),
        Err(AuthError::TokenExpired) => {
            let refresh = headers.get(REFRESH_HEADER)?.to_str().ok()?;

            match state.sessions.reissue_access_token(refresh).await {
                Ok((token, subject)) => Some((subject.into(), Some(token))),
                Err(e) => {
                    tracing::debug!(error = %e, "Refresh token rejected");
                    None
                }
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Access token rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{HttpResponse, http::StatusCode, test};

    use quill_core::ports::TokenService;
    use quill_infra::{JwtConfig, JwtTokenService};

    use super::*;
    use crate::testing::{TestContext, jwt_config};

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(identity.user_id.to_string())
    }

    macro_rules! whoami_app {
        ($ctx:expr) => {
            test::init_service(
                actix_web::App::new()
                    .wrap(ResolveIdentity)
                    .app_data(web::Data::new($ctx.state.clone()))
                    .route("/whoami", web::get().to(whoami)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_valid_access_token_resolves_identity() {
        let ctx = TestContext::new();
        let user = ctx.signed_in("jane@example.com").await;
        let app = whoami_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", user.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(ACCESS_TOKEN_HEADER).is_none());
        let body = test::read_body(resp).await;
        assert_eq!(body, user.user_id.to_string());
    }

    #[actix_web::test]
    async fn test_missing_or_garbage_token_is_anonymous() {
        let ctx = TestContext::new();
        let app = whoami_app!(ctx);

        let req = test::TestRequest::get().uri("/whoami").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let ctx = TestContext::new();
        let user = ctx.signed_in("jane@example.com").await;
        let app = whoami_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", user.refresh_token)))
            .to_request();

        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn test_expired_access_token_is_reissued_from_refresh() {
        let ctx = TestContext::new();
        let user = ctx.signed_in("jane@example.com").await;
        let expired = JwtTokenService::new(JwtConfig {
            access_ttl_minutes: -5,
            ..jwt_config()
        })
        .issue(&user.subject, TokenKind::Access)
        .unwrap();
        let app = whoami_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {expired}")))
            .insert_header((REFRESH_HEADER, user.refresh_token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let reissued = resp
            .headers()
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap();
        let claims = ctx.tokens.validate(&reissued, TokenKind::Access).unwrap();
        assert_eq!(claims.subject.user_id, user.user_id);
        assert_eq!(claims.subject.session_id, user.session_id);
    }

    #[actix_web::test]
    async fn test_expired_access_token_without_refresh_is_anonymous() {
        let ctx = TestContext::new();
        let user = ctx.signed_in("jane@example.com").await;
        let expired = JwtTokenService::new(JwtConfig {
            access_ttl_minutes: -5,
            ..jwt_config()
        })
        .issue(&user.subject, TokenKind::Access)
        .unwrap();
        let app = whoami_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {expired}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().get(ACCESS_TOKEN_HEADER).is_none());
    }

    #[actix_web::test]
    async fn test_refresh_rejected_for_invalidated_session() {
        let ctx = TestContext::new();
        let user = ctx.signed_in("jane@example.com").await;
        ctx.state.sessions.invalidate(user.session_id).await.unwrap();
        let expired = JwtTokenService::new(JwtConfig {
            access_ttl_minutes: -5,
            ..jwt_config()
        })
        .issue(&user.subject, TokenKind::Access)
        .unwrap();
        let app = whoami_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {expired}")))
            .insert_header((REFRESH_HEADER, user.refresh_token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().get(ACCESS_TOKEN_HEADER).is_none());
    }
}
