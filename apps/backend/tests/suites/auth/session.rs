// Session-protected routes and the login-to-expiry lifecycle.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use actix_web::test;
use auth_backend::services::credentials::CredentialService;
use auth_backend::state::{AppState, SecurityConfig};
use auth_backend::AppError;
use backend_test_support::unique_helpers::unique_str;
use serde_json::Value;

use crate::common::assert_problem;
use crate::support::app_builder::create_test_app;
use crate::support::auth::{bearer_header, mint_expired_token, mint_test_token};
use crate::support::identity_provider::{provider_claims, FakeTokenInfo};

fn session_request(authorization: Option<&str>) -> actix_http::Request {
    let req = test::TestRequest::get().uri("/api/auth/session");
    match authorization {
        Some(value) => req.insert_header(("Authorization", value)).to_request(),
        None => req.to_request(),
    }
}

fn app_state() -> (AppState, SecurityConfig, FakeTokenInfo) {
    let provider = FakeTokenInfo::start(Default::default());
    let security = SecurityConfig::for_tests();
    let state = AppState::in_memory(Arc::new(provider.verifier()), security.clone());
    (state, security, provider)
}

#[actix_web::test]
async fn test_session_returns_verified_claims() {
    let (state, security, _provider) = app_state();
    let app = create_test_app(state).build().await;
    let sub = unique_str("acct");

    let resp = test::call_service(&app, session_request(Some(bearer_header(&sub, &security).as_str()))).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sub"], sub.as_str());
    assert!(body["iat"].is_i64());
    assert_eq!(body["exp"].as_i64(), body["iat"].as_i64().map(|iat| iat + 3600));
}

#[actix_web::test]
async fn test_missing_or_malformed_bearer() {
    let (state, security, _provider) = app_state();
    let app = create_test_app(state).build().await;
    let token = mint_test_token("acct-1", &security);

    let basic = "Basic dXNlcjpwYXNz".to_string();
    let no_token = "Bearer".to_string();
    let extra_part = format!("Bearer {token} extra");

    let resp = test::call_service(&app, session_request(None)).await;
    assert_problem(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;

    for value in [&basic, &no_token, &extra_part] {
        let resp = test::call_service(&app, session_request(Some(value.as_str()))).await;
        assert_problem(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;
    }
}

#[actix_web::test]
async fn test_every_token_failure_looks_the_same() {
    let (state, security, _provider) = app_state();
    let app = create_test_app(state).build().await;

    let valid = mint_test_token("acct-1", &security);
    let (head, _) = valid.rsplit_once('.').unwrap();
    let foreign = SecurityConfig::new("another_secret_key_that_is_long_enough")
        .unwrap()
        .codec
        .issue_session(auth_backend::SessionGrant::new("acct-1"), None)
        .unwrap();

    let candidates = [
        "garbage".to_string(),
        "a.b".to_string(),
        "a.b.c.d".to_string(),
        format!("{head}.AAAA"),
        mint_expired_token("acct-1", &security),
        foreign,
    ];

    let mut details = Vec::new();
    for token in candidates {
        let resp =
            test::call_service(&app, session_request(Some(format!("Bearer {token}").as_str()))).await;
        let problem = assert_problem(resp, 401, "UNAUTHORIZED_INVALID_TOKEN").await;
        details.push(problem.detail);
    }
    details.dedup();
    assert_eq!(details.len(), 1, "rejections must be indistinguishable");
}

#[actix_web::test]
async fn test_login_to_expiry_lifecycle() {
    let sub = unique_str("acct");
    let provider =
        FakeTokenInfo::accepting("good-id-token", provider_claims(&sub, "viewer@example.test"));
    let credentials = CredentialService::new(
        Arc::new(provider.verifier()),
        SecurityConfig::for_tests(),
    );

    let t0 = UNIX_EPOCH + Duration::from_secs(1_750_000_000);
    let issued = credentials.login_at("good-id-token", t0).await.unwrap();
    assert_eq!(issued.expires_at, Some(1_750_003_600));

    let claims = credentials
        .authorize_at(&issued.token, t0 + Duration::from_secs(10))
        .unwrap();
    assert_eq!(claims.sub, sub);
    assert_eq!(claims.email.as_deref(), Some("viewer@example.test"));
    assert_eq!(claims.iat, 1_750_000_000);

    // Valid strictly before exp, invalid at exp and after
    assert!(credentials
        .authorize_at(&issued.token, t0 + Duration::from_secs(3599))
        .is_ok());
    assert!(matches!(
        credentials.authorize_at(&issued.token, t0 + Duration::from_secs(3600)),
        Err(AppError::UnauthorizedInvalidToken)
    ));
    assert!(matches!(
        credentials.authorize_at(&issued.token, t0 + Duration::from_secs(3601)),
        Err(AppError::UnauthorizedInvalidToken)
    ));
}

#[actix_web::test]
async fn test_health_is_public() {
    let (state, _, _provider) = app_state();
    let app = create_test_app(state).build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
