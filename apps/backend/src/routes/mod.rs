use actix_web::web;

pub mod games;
pub mod health;
pub mod realtime;

/// Register every HTTP and websocket endpoint.
///
/// Used by `main.rs` and by integration tests, so both exercise the same
/// paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health checks: /health, /api/health
    health::configure_routes(cfg);

    // Read-only registry views: /api/stats, /api/games/**
    cfg.service(web::scope("/api").configure(games::configure_routes));

    // Realtime: /ws
    realtime::configure_routes(cfg);
}
