pub mod game_flow;
pub mod game_manager;
pub mod notifier;
