use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::services::game_manager::{RegistryStats, WaitingSession};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(flatten)]
    games: RegistryStats,
    connections: usize,
}

#[derive(Debug, Serialize)]
struct WaitingGamesResponse {
    games: Vec<WaitingSession>,
}

/// Registry counters plus open websocket connections.
async fn stats(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(StatsResponse {
        games: app_state.registry.stats(),
        connections: app_state.hub.connection_count(),
    }))
}

/// Sessions still in the lobby with a free seat.
async fn waiting_games(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(WaitingGamesResponse {
        games: app_state.registry.waiting_sessions(),
    }))
}

async fn game_summary(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner().to_ascii_uppercase();
    let summary = app_state.registry.summary(&session_id)?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(stats))
        .route("/games", web::get().to(waiting_games))
        .route("/games/{session_id}", web::get().to(game_summary));
}
