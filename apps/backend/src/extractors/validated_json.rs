use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// JSON body extractor whose failures render as problem details (400).
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            match json.await {
                Ok(body) => Ok(ValidatedJson(body.into_inner())),
                Err(e) => {
                    // The payload may hold credentials; only the error kind is logged
                    debug!(error_kind = %json_error_kind(&e), "rejected JSON body");
                    Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        "Request body is not valid JSON for this endpoint",
                    ))
                }
            }
        })
    }
}

fn json_error_kind(e: &actix_web::Error) -> &'static str {
    match e.as_error::<actix_web::error::JsonPayloadError>() {
        Some(actix_web::error::JsonPayloadError::ContentType) => "content_type",
        Some(actix_web::error::JsonPayloadError::Deserialize(_)) => "deserialize",
        Some(actix_web::error::JsonPayloadError::Overflow { .. })
        | Some(actix_web::error::JsonPayloadError::OverflowKnownLength { .. }) => "overflow",
        Some(_) => "payload",
        None => "other",
    }
}
