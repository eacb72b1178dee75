// TokenInfoVerifier against a live local provider.

use auth_backend::auth::identity::{IdentityVerifier, TokenInfoVerifier};
use auth_backend::config::IdentityProviderConfig;

use crate::support::identity_provider::{
    provider_claims, FakeTokenInfo, CLIENT_ID, GARBLED_TOKEN, SLOW_TOKEN,
};

#[actix_web::test]
async fn accepted_token_yields_provider_claims() {
    let provider = FakeTokenInfo::accepting(
        "good-id-token",
        provider_claims("110169484474386276334", "viewer@example.test"),
    );
    let verifier = provider.verifier();

    let claims = verifier
        .verify("good-id-token")
        .await
        .expect("provider vouches for token");

    assert_eq!(claims.sub, "110169484474386276334");
    assert_eq!(claims.email.as_deref(), Some("viewer@example.test"));
    assert!(claims.email_verified.as_ref().is_some_and(|v| v.as_bool()));
    assert_eq!(claims.aud.as_deref(), Some(CLIENT_ID));
    assert_eq!(provider.calls(), 1);
}

#[actix_web::test]
async fn token_reaches_provider_intact_through_query_encoding() {
    let token = "a+b/c=d&id_token=x y%";
    let provider = FakeTokenInfo::accepting(token, provider_claims("s1", "s1@example.test"));

    let claims = provider
        .verifier()
        .verify(token)
        .await
        .expect("provider vouches for the exact token");

    assert_eq!(claims.sub, "s1");
    assert_eq!(provider.received_tokens(), vec![token.to_string()]);
}

#[actix_web::test]
async fn provider_rejection_yields_nothing() {
    let provider = FakeTokenInfo::accepting("good-id-token", provider_claims("s", "s@example.test"));
    let verifier = provider.verifier();

    assert!(verifier.verify("forged-id-token").await.is_none());
    assert_eq!(provider.calls(), 1);
}

#[actix_web::test]
async fn unreadable_body_fails_closed() {
    let provider = FakeTokenInfo::start(Default::default());
    assert!(provider.verifier().verify(GARBLED_TOKEN).await.is_none());
}

#[actix_web::test]
async fn slow_provider_fails_closed() {
    let provider = FakeTokenInfo::start(Default::default());
    assert!(provider.verifier().verify(SLOW_TOKEN).await.is_none());
}

#[actix_web::test]
async fn empty_token_never_reaches_provider() {
    let provider = FakeTokenInfo::start(Default::default());
    assert!(provider.verifier().verify("").await.is_none());
    assert_eq!(provider.calls(), 0);
}

#[actix_web::test]
async fn foreign_audience_is_rejected() {
    let mut claims = provider_claims("s", "s@example.test");
    claims["aud"] = "someone-elses-client".into();
    let provider = FakeTokenInfo::accepting("other-app-token", claims);

    assert!(provider.verifier().verify("other-app-token").await.is_none());

    // Without a configured client id the audience is not checked
    let open = TokenInfoVerifier::new(&IdentityProviderConfig {
        client_id: None,
        ..provider.config()
    })
    .unwrap();
    assert!(open.verify("other-app-token").await.is_some());
}

#[actix_web::test]
async fn missing_subject_is_rejected() {
    let mut claims = provider_claims("", "s@example.test");
    claims["sub"] = "".into();
    let provider = FakeTokenInfo::accepting("no-sub-token", claims);

    assert!(provider.verifier().verify("no-sub-token").await.is_none());
}

#[actix_web::test]
async fn stopped_provider_fails_closed() {
    let provider = FakeTokenInfo::accepting("good-id-token", provider_claims("s", "s@example.test"));
    let verifier = provider.verifier();
    provider.stop().await;

    assert!(verifier.verify("good-id-token").await.is_none());
}
