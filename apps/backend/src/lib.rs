#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod ws;


// Re-exports for public API
pub use config::{Pacing, ServerConfig};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use services::game_flow::GameFlowService;
pub use services::game_manager::SessionRegistry;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
