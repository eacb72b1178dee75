use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use auth_backend::auth::identity::TokenInfoVerifier;
use auth_backend::config::Config;
use auth_backend::middleware::cors::cors_middleware;
use auth_backend::middleware::request_trace::RequestTrace;
use auth_backend::middleware::structured_logger::StructuredLogger;
use auth_backend::middleware::trace_span::TraceSpan;
use auth_backend::routes;
use auth_backend::state::{AppState, SecurityConfig};
use auth_backend::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let security = match SecurityConfig::new(config.jwt_secret.as_bytes()) {
        Ok(security) => security.with_session_ttl(config.session_ttl),
        Err(e) => {
            error!(error = %e, "invalid session token secret");
            std::process::exit(1);
        }
    };

    let verifier = match TokenInfoVerifier::new(&config.identity) {
        Ok(verifier) => verifier,
        Err(e) => {
            error!(error = %e, "failed to set up identity verifier");
            std::process::exit(1);
        }
    };

    let data = web::Data::new(AppState::in_memory(Arc::new(verifier), security));

    info!(
        host = %config.host,
        port = config.port,
        tokeninfo_url = %config.identity.tokeninfo_url,
        "starting auth backend"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
