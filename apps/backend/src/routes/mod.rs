use actix_web::web;

pub mod auth;
pub mod health;
pub mod profiles;

/// Mount every route. Shared by `main.rs` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Profile PIN routes: /api/profiles/**
    cfg.service(web::scope("/api/profiles").configure(profiles::configure_routes));
}
