use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use hokm_backend::config::ServerConfig;
use hokm_backend::routes;
use hokm_backend::services::game_manager::spawn_idle_cleanup;
use hokm_backend::state::app_state::AppState;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or sourced manually for local development).
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(&config);
    spawn_idle_cleanup(
        app_state.registry.clone(),
        config.cleanup_interval,
        config.idle_timeout,
    );

    info!(
        host = %config.host,
        port = config.port,
        bot_style = config.bot_style.as_str(),
        "starting hokm server"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
