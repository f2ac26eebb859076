use tracing::{debug, info};

use super::broadcast::public_player;
use super::GameFlowService;
use crate::domain::engine::RemovalOutcome;
use crate::error::AppError;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    pub(super) fn add_bot(&self, player_id: &str) -> Result<(), AppError> {
        let (session_id, session) = self.seated(player_id)?;
        let mut guard = session.lock();
        Self::require_creator(&guard.engine, player_id, "add bots")?;
        let bot_id = guard.engine.add_bot()?.id.clone();
        info!(session_id = %session_id, bot_id = %bot_id, "bot added");

        let engine = &guard.engine;
        if let Some(view) = public_player(engine, &bot_id) {
            self.broadcast(engine, &ServerMsg::PlayerJoined { player: view });
        }
        self.broadcast_state(engine);
        Ok(())
    }

    pub(super) fn remove_bot(&self, player_id: &str, bot_id: &str) -> Result<(), AppError> {
        let (session_id, session) = self.seated(player_id)?;
        let mut guard = session.lock();
        Self::require_creator(&guard.engine, player_id, "remove bots")?;
        guard.engine.remove_bot(bot_id)?;
        info!(session_id = %session_id, bot_id, "bot removed");

        self.broadcast(
            &guard.engine,
            &ServerMsg::PlayerLeft {
                player_id: bot_id.to_string(),
            },
        );
        self.broadcast_state(&guard.engine);
        Ok(())
    }

    /// Explicit leave and connection loss take the same path. In the lobby
    /// the seat is freed; once play has started a bot takes it over.
    pub(super) fn leave(&self, player_id: &str) -> Result<(), AppError> {
        let outcome = self.registry.leave_session(player_id)?;
        if outcome.destroyed {
            return Ok(());
        }
        let Ok(session) = self.registry.lookup(&outcome.session_id) else {
            return Ok(());
        };

        let mut guard = session.lock();
        if outcome.removal == RemovalOutcome::MarkedDisconnected {
            let bot = guard.engine.replace_with_bot(player_id)?;
            info!(
                session_id = %outcome.session_id,
                player_id,
                bot_name = %bot.name,
                "seat handed to a bot"
            );
        }
        self.broadcast(
            &guard.engine,
            &ServerMsg::PlayerLeft {
                player_id: player_id.to_string(),
            },
        );
        self.broadcast_state(&guard.engine);

        // Other automated seats already have a timer armed.
        let owes_decision = guard
            .engine
            .pending_automated_decision()
            .is_some_and(|d| d.player_id == player_id);
        if owes_decision {
            self.schedule_autoplay(&outcome.session_id, &guard, false);
        }
        Ok(())
    }

    /// The connection for `player_id` is gone.
    pub fn handle_disconnect(&self, player_id: &str) {
        if let Err(err) = self.leave(player_id) {
            // Connections that never joined a game end up here.
            debug!(player_id, code = %err.code(), "disconnect without a seat");
        }
    }
}
