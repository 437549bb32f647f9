//! Prometheus scrape endpoint.

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /metrics - 404 when metrics are disabled.
pub async fn metrics(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let metrics = state.metrics.as_ref().ok_or(AppError::NotFound)?;
    let body = metrics.encode()?;

    Ok(HttpResponse::Ok()
        .content_type(metrics.content_type())
        .body(body))
}
