use tracing::info;

use super::GameFlowService;
use crate::domain::engine::HokmEngine;
use crate::domain::player_view::PlayerView;
use crate::services::game_manager::GameSession;
use crate::services::notifier::NotableEvent;
use crate::ws::protocol::ServerMsg;

/// Addressed delivery to one connection. Implementations must not block;
/// the flow calls this while holding a session lock.
pub trait Outbox: Send + Sync {
    fn send(&self, player_id: &str, msg: ServerMsg);
}

/// A player as everyone may see them: no cards.
pub(super) fn public_player(engine: &HokmEngine, player_id: &str) -> Option<PlayerView> {
    engine
        .view_for("")
        .players
        .into_iter()
        .find(|p| p.id == player_id)
}

impl GameFlowService {
    pub(super) fn send_to(&self, player_id: &str, msg: ServerMsg) {
        self.outbox.send(player_id, msg);
    }

    /// Same frame to every connected human at the table.
    pub(super) fn broadcast(&self, engine: &HokmEngine, msg: &ServerMsg) {
        for player in engine.players().iter().filter(|p| !p.is_bot && p.is_connected) {
            self.outbox.send(&player.id, msg.clone());
        }
    }

    /// Each connected human gets their own redacted view, then their hand.
    pub(super) fn broadcast_state(&self, engine: &HokmEngine) {
        for player in engine.players().iter().filter(|p| !p.is_bot && p.is_connected) {
            self.outbox.send(
                &player.id,
                ServerMsg::State {
                    state: engine.view_for(&player.id),
                },
            );
            self.outbox.send(
                &player.id,
                ServerMsg::Hand {
                    cards: player.hand.clone(),
                },
            );
        }
    }

    /// Forward to the notifier if the session carries a notification target.
    pub(super) fn notify(&self, session_id: &str, session: &GameSession, event: NotableEvent) {
        if let Some(target) = session.notify_target {
            info!(session_id, target, event = event.name(), "notifying");
            self.notifier.notify(session_id, target, &event);
        }
    }
}
