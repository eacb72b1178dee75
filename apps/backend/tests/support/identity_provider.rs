//! Local stand-in for the provider's tokeninfo endpoint.
//!
//! Runs a real HTTP server on an ephemeral port so the production
//! `TokenInfoVerifier` is exercised end to end.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpResponse, HttpServer};
use auth_backend::auth::identity::TokenInfoVerifier;
use auth_backend::config::IdentityProviderConfig;
use serde::Deserialize;
use serde_json::{json, Value};

/// Audience the fake provider stamps on accepted tokens
pub const CLIENT_ID: &str = "streaming-web-client";
/// Answered only after longer than the verifier timeout
pub const SLOW_TOKEN: &str = "slow-token";
/// Answered with 200 and a body that is not JSON
pub const GARBLED_TOKEN: &str = "garbled-token";

struct ProviderState {
    accepted: HashMap<String, Value>,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<String>>>,
}

#[derive(Deserialize)]
struct TokenInfoQuery {
    id_token: Option<String>,
}

async fn tokeninfo(
    query: web::Query<TokenInfoQuery>,
    state: web::Data<ProviderState>,
) -> HttpResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let token = query.id_token.as_deref().unwrap_or_default();
    state.received.lock().unwrap().push(token.to_string());

    match token {
        SLOW_TOKEN => {
            actix_web::rt::time::sleep(Duration::from_secs(3)).await;
            HttpResponse::Ok().json(json!({ "sub": "too-late", "aud": CLIENT_ID }))
        }
        GARBLED_TOKEN => HttpResponse::Ok()
            .content_type("application/json")
            .body("{not json"),
        _ => match state.accepted.get(token) {
            Some(body) => HttpResponse::Ok().json(body),
            None => HttpResponse::BadRequest().json(json!({
                "error": "invalid_token",
                "error_description": "Invalid Value"
            })),
        },
    }
}

/// Claims body shaped like the real provider's answer
pub fn provider_claims(sub: &str, email: &str) -> Value {
    json!({
        "iss": "https://accounts.example.test",
        "azp": CLIENT_ID,
        "aud": CLIENT_ID,
        "sub": sub,
        "email": email,
        "email_verified": "true",
        "name": "Test Viewer",
        "picture": "https://cdn.example.test/avatar.png",
        "iat": "1700000000",
        "exp": "1700003600",
        "alg": "RS256",
        "kid": "test-key"
    })
}

pub struct FakeTokenInfo {
    base_url: String,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<String>>>,
    handle: ServerHandle,
}

impl FakeTokenInfo {
    /// Start a provider that accepts exactly the tokens in `accepted`.
    pub fn start(accepted: HashMap<String, Value>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let calls = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = web::Data::new(ProviderState {
            accepted,
            calls: calls.clone(),
            received: received.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .route("/tokeninfo", web::get().to(tokeninfo))
        })
        .workers(1)
        .disable_signals()
        .listen(listener)
        .expect("listen on ephemeral port")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            calls,
            received,
            handle,
        }
    }

    /// Start a provider that accepts a single token.
    pub fn accepting(token: &str, claims: Value) -> Self {
        Self::start(HashMap::from([(token.to_string(), claims)]))
    }

    pub fn tokeninfo_url(&self) -> String {
        format!("{}/tokeninfo", self.base_url)
    }

    /// Number of tokeninfo requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `id_token` values as decoded by the provider, in arrival order
    pub fn received_tokens(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn config(&self) -> IdentityProviderConfig {
        IdentityProviderConfig {
            tokeninfo_url: self.tokeninfo_url(),
            client_id: Some(CLIENT_ID.to_string()),
            timeout: Duration::from_secs(1),
        }
    }

    pub fn verifier(&self) -> TokenInfoVerifier {
        TokenInfoVerifier::new(&self.config()).expect("verifier for fake provider")
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
