// Profile PIN endpoints.

use std::sync::Arc;

use actix_web::test;
use auth_backend::repos::profile_pins::{InMemoryProfilePins, ProfileKey, ProfilePinRepo};
use auth_backend::state::{AppState, SecurityConfig};
use backend_test_support::unique_helpers::{unique_profile_id, unique_str};
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::app_builder::create_test_app;
use crate::support::auth::bearer_header;
use crate::support::identity_provider::FakeTokenInfo;

struct Harness {
    state: AppState,
    security: SecurityConfig,
    repo: Arc<InMemoryProfilePins>,
    _provider: FakeTokenInfo,
}

fn harness() -> Harness {
    let provider = FakeTokenInfo::start(Default::default());
    let security = SecurityConfig::for_tests();
    let repo = Arc::new(InMemoryProfilePins::new());
    let state = AppState::new(
        Arc::new(provider.verifier()),
        security.clone(),
        repo.clone(),
    );
    Harness {
        state,
        security,
        repo,
        _provider: provider,
    }
}

fn pin_uri(profile_id: &str) -> String {
    format!("/api/profiles/{profile_id}/pin")
}

fn verify_uri(profile_id: &str) -> String {
    format!("/api/profiles/{profile_id}/pin/verify")
}

#[actix_web::test]
async fn test_pin_lifecycle_over_http() {
    let h = harness();
    let account = unique_str("acct");
    let profile = unique_profile_id();
    let auth = bearer_header(&account, &h.security);
    let repo = h.repo.clone();
    let app = create_test_app(h.state).build().await;

    // No PIN yet: status false, anything unlocks
    let req = test::TestRequest::get()
        .uri(&pin_uri(&profile))
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "pin_set": false }));

    let req = test::TestRequest::post()
        .uri(&verify_uri(&profile))
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "pin": "0000" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "unlocked": true }));

    // Enable
    let req = test::TestRequest::put()
        .uri(&pin_uri(&profile))
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "pin": "4321" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);

    let stored = repo
        .find(&ProfileKey::new(account.as_str(), profile.as_str()))
        .await
        .unwrap()
        .expect("credential stored under the session subject");
    assert!(!stored.hash.contains("4321"));

    for (candidate, expected) in [("4321", true), ("1234", false)] {
        let req = test::TestRequest::post()
            .uri(&verify_uri(&profile))
            .insert_header(("Authorization", auth.as_str()))
            .set_json(json!({ "pin": candidate }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["unlocked"], expected, "{candidate}");
    }

    // Disable, twice; the second call is a no-op
    for _ in 0..2 {
        let req = test::TestRequest::delete()
            .uri(&pin_uri(&profile))
            .insert_header(("Authorization", auth.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 204);
    }

    let req = test::TestRequest::get()
        .uri(&pin_uri(&profile))
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "pin_set": false }));
}

#[actix_web::test]
async fn test_malformed_pins_are_rejected_before_storage() {
    let h = harness();
    let account = unique_str("acct");
    let profile = unique_profile_id();
    let auth = bearer_header(&account, &h.security);
    let repo = h.repo.clone();
    let app = create_test_app(h.state).build().await;

    for bad in ["", "123", "12345", "12a4", " 123"] {
        let req = test::TestRequest::put()
            .uri(&pin_uri(&profile))
            .insert_header(("Authorization", auth.as_str()))
            .set_json(json!({ "pin": bad }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem(resp, 400, "INVALID_PIN_FORMAT").await;
    }

    assert!(repo
        .find(&ProfileKey::new(account.as_str(), profile.as_str()))
        .await
        .unwrap()
        .is_none());

    // Without a PIN, a malformed candidate is still a 400
    let req = test::TestRequest::post()
        .uri(&verify_uri(&profile))
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "pin": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "INVALID_PIN_FORMAT").await;

    // Once a PIN exists, a malformed candidate is a 400 rather than a mismatch
    let req = test::TestRequest::put()
        .uri(&pin_uri(&profile))
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "pin": "2468" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    let req = test::TestRequest::post()
        .uri(&verify_uri(&profile))
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "pin": "24680" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "INVALID_PIN_FORMAT").await;
}

#[actix_web::test]
async fn test_pins_are_scoped_to_the_session_account() {
    let h = harness();
    let profile = "main";
    let owner = bearer_header(&unique_str("acct"), &h.security);
    let other = bearer_header(&unique_str("acct"), &h.security);
    let app = create_test_app(h.state).build().await;

    let req = test::TestRequest::put()
        .uri(&pin_uri(profile))
        .insert_header(("Authorization", owner.as_str()))
        .set_json(json!({ "pin": "9876" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    // Same profile id under another account has no PIN
    let req = test::TestRequest::get()
        .uri(&pin_uri(profile))
        .insert_header(("Authorization", other.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "pin_set": false }));
}

#[actix_web::test]
async fn test_pin_routes_require_a_session() {
    let h = harness();
    let app = create_test_app(h.state).build().await;

    let req = test::TestRequest::get().uri(&pin_uri("main")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;

    let req = test::TestRequest::put()
        .uri(&pin_uri("main"))
        .insert_header(("Authorization", "Bearer not.a.token"))
        .set_json(json!({ "pin": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 401, "UNAUTHORIZED_INVALID_TOKEN").await;
}

#[actix_web::test]
async fn test_invalid_profile_id() {
    let h = harness();
    let auth = bearer_header(&unique_str("acct"), &h.security);
    let app = create_test_app(h.state).build().await;

    let long_id = "p".repeat(65);
    for profile in ["bad%20id", "caf%C3%A9", long_id.as_str()] {
        let req = test::TestRequest::get()
            .uri(&pin_uri(profile))
            .insert_header(("Authorization", auth.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem(resp, 400, "INVALID_PROFILE_ID").await;
    }
}
