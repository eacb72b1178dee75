use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::claims::SessionClaims;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::state::app_state::AppState;

/// Verified session claims of the caller.
///
/// Missing or malformed Authorization headers and every token failure end
/// the request with a 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionClaims);

impl CurrentSession {
    /// Account subject the session was issued for
    pub fn sub(&self) -> &str {
        &self.0.sub
    }
}

impl FromRequest for CurrentSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<CurrentSession, AppError> {
    let bearer = AuthToken::from_request_headers(req)?;

    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not found"))?;

    app_state
        .credentials
        .authorize(&bearer.token)
        .map(CurrentSession)
}
