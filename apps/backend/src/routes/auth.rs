use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::current_session::CurrentSession;
use crate::extractors::validated_json::ValidatedJson;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Identity token issued by the provider to the client
    #[serde(default)]
    pub id_token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Exchange a provider identity token for a session token.
async fn login(
    req: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let issued = app_state.credentials.login(&req.id_token).await?;
    Ok(HttpResponse::Ok().json(issued))
}

/// Describe the caller's current session.
async fn session(current: CurrentSession) -> Result<HttpResponse, AppError> {
    let CurrentSession(claims) = current;
    Ok(HttpResponse::Ok().json(SessionResponse {
        sub: claims.sub,
        email: claims.email,
        email_verified: claims.email_verified,
        name: claims.name,
        picture: claims.picture,
        iat: claims.iat,
        exp: claims.exp,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/session").route(web::get().to(session)));
}
