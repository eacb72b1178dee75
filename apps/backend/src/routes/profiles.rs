//! Per-profile PIN management for the signed-in account.
//!
//! Every route requires a session; the account is always the session
//! subject, never a request field.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_session::CurrentSession;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::profile_pins::ProfileKey;
use crate::services::profile_pins;
use crate::state::app_state::AppState;

pub const MAX_PROFILE_ID_LEN: usize = 64;

#[derive(Deserialize)]
pub struct SetPinRequest {
    #[serde(default)]
    pub pin: String,
}

#[derive(Deserialize)]
pub struct VerifyPinRequest {
    #[serde(default)]
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct PinStatusResponse {
    pub pin_set: bool,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
}

/// Profile ids are opaque, but bounded to a conservative charset.
pub fn validate_profile_id(profile_id: &str) -> Result<(), AppError> {
    let well_formed = !profile_id.is_empty()
        && profile_id.len() <= MAX_PROFILE_ID_LEN
        && profile_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    if well_formed {
        Ok(())
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidProfileId,
            format!("Profile id must be 1-{MAX_PROFILE_ID_LEN} characters of [A-Za-z0-9_-]"),
        ))
    }
}

fn profile_key(session: &CurrentSession, profile_id: String) -> Result<ProfileKey, AppError> {
    validate_profile_id(&profile_id)?;
    Ok(ProfileKey::new(session.sub(), profile_id))
}

async fn pin_status(
    session: CurrentSession,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let key = profile_key(&session, path.into_inner())?;
    let pin_set = profile_pins::pin_status(app_state.profile_pins.as_ref(), &key).await?;

    Ok(HttpResponse::Ok().json(PinStatusResponse { pin_set }))
}

async fn set_pin(
    session: CurrentSession,
    path: web::Path<String>,
    body: ValidatedJson<SetPinRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let key = profile_key(&session, path.into_inner())?;
    profile_pins::set_pin(
        &app_state.credentials,
        app_state.profile_pins.as_ref(),
        key,
        &body.pin,
    )
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn clear_pin(
    session: CurrentSession,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let key = profile_key(&session, path.into_inner())?;
    // Idempotent: clearing an unset PIN is not an error
    profile_pins::clear_pin(app_state.profile_pins.as_ref(), &key).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn verify_pin(
    session: CurrentSession,
    path: web::Path<String>,
    body: ValidatedJson<VerifyPinRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let key = profile_key(&session, path.into_inner())?;
    let unlocked = profile_pins::unlock(
        &app_state.credentials,
        app_state.profile_pins.as_ref(),
        &key,
        &body.pin,
    )
    .await?;

    Ok(HttpResponse::Ok().json(UnlockResponse { unlocked }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{profile_id}/pin")
            .route(web::get().to(pin_status))
            .route(web::put().to(set_pin))
            .route(web::delete().to(clear_pin)),
    )
    .service(web::resource("/{profile_id}/pin/verify").route(web::post().to(verify_pin)));
}
