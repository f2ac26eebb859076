use std::sync::Arc;

use crate::ai::{create_ai, AiPlayer, HokmBot, PlayStyle};
use crate::config::{Pacing, ServerConfig};
use crate::services::game_flow::GameFlowService;
use crate::services::game_manager::SessionRegistry;
use crate::ws::hub::WsRegistry;

/// Shared resources handed to every handler and websocket actor.
#[derive(Clone)]
pub struct AppState {
    /// Every live game session
    pub registry: Arc<SessionRegistry>,
    /// Open websocket connections, also the flow's outbox
    pub hub: Arc<WsRegistry>,
    pub flow: GameFlowService,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_pacing(config.pacing.clone(), config.bot_style, None)
    }

    /// Build with explicit pacing and, optionally, seeded session RNGs.
    pub fn with_pacing(pacing: Pacing, style: PlayStyle, seed: Option<u64>) -> Self {
        let registry = Arc::new(match seed {
            Some(seed) => SessionRegistry::with_seed(seed),
            None => SessionRegistry::new(),
        });
        let hub = Arc::new(WsRegistry::new());
        let policy: Arc<dyn AiPlayer> = match create_ai(style.as_str(), seed) {
            Some(ai) => Arc::<dyn AiPlayer + Send + Sync>::from(ai),
            None => Arc::new(HokmBot::new(style)),
        };
        let flow = GameFlowService::new(Arc::clone(&registry), hub.clone(), policy, pacing);
        Self {
            registry,
            hub,
            flow,
        }
    }
}
