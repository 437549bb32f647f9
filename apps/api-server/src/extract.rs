//! Request body extraction with validation.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use validator::Validate;

use quill_shared::FieldError;

use crate::middleware::error::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON is answered with 400 and the parser message; rule failures
/// with 400 and one entry per failing field.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(value) = json
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            value
                .validate()
                .map_err(|e| AppError::Validation(FieldError::from_validation(&e)))?;

            Ok(ValidatedJson(value))
        })
    }
}
