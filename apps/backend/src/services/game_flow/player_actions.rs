use tracing::info;

use super::broadcast::public_player;
use super::{FollowUp, GameFlowService, ScheduledAction};
use crate::domain::engine::{HokmEngine, StartOutcome};
use crate::domain::state::PhaseKind;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::services::game_manager::CreatorInfo;
use crate::services::notifier::NotableEvent;
use crate::ws::protocol::ServerMsg;

/// Longest accepted display name, in characters.
const MAX_NAME_LEN: usize = 32;

fn clean_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::BadRequest,
            "Player name is required",
        ));
    }
    Ok(name.chars().take(MAX_NAME_LEN).collect())
}

fn player_names(engine: &HokmEngine) -> Vec<String> {
    engine.players().iter().map(|p| p.name.clone()).collect()
}

impl GameFlowService {
    /// The creator is the lowest-seated human. Bots are skipped so a lobby
    /// whose creator left with a bot in seat 0 can still be managed.
    pub(super) fn require_creator(
        engine: &HokmEngine,
        player_id: &str,
        what: &str,
    ) -> Result<(), DomainError> {
        let creator = engine.players().iter().find(|p| !p.is_bot);
        if creator.map(|p| p.id.as_str()) == Some(player_id) {
            Ok(())
        } else {
            Err(DomainError::validation(
                ValidationKind::NotParticipant,
                format!("Only the game creator can {what}"),
            ))
        }
    }

    pub(super) fn create_session(
        &self,
        player_id: &str,
        player_name: &str,
        external_id: Option<String>,
    ) -> Result<(), AppError> {
        let name = clean_name(player_name)?;
        if self.registry.session_of(player_id).is_some() {
            return Err(
                DomainError::conflict(ConflictKind::AlreadyInSession, "Already in a game").into(),
            );
        }

        let session_id = self.registry.create_session()?;
        if let Err(err) =
            self.registry
                .join_session(&session_id, player_id, &name, external_id.clone())
        {
            self.registry.destroy_session(&session_id);
            return Err(err.into());
        }
        if let Some(external_id) = external_id {
            self.registry.set_creator(
                &session_id,
                CreatorInfo {
                    external_id,
                    username: None,
                },
            )?;
        }

        let session = self.registry.lookup(&session_id)?;
        let guard = session.lock();
        self.broadcast_state(&guard.engine);
        Ok(())
    }

    pub(super) fn join_session(
        &self,
        player_id: &str,
        session_id: &str,
        player_name: &str,
        external_id: Option<String>,
    ) -> Result<(), AppError> {
        let name = clean_name(player_name)?;
        let session_id = session_id.trim().to_ascii_uppercase();
        let player = self
            .registry
            .join_session(&session_id, player_id, &name, external_id.clone())?;

        let session = self.registry.lookup(&session_id)?;
        let guard = session.lock();
        let engine = &guard.engine;
        if let Some(view) = public_player(engine, &player.id) {
            self.broadcast(engine, &ServerMsg::PlayerJoined { player: view });
        }
        self.broadcast_state(engine);
        self.notify(
            &session_id,
            &guard,
            NotableEvent::PlayerJoined {
                player_name: player.name,
                external_id,
                player_count: engine.connected_humans(),
                players: player_names(engine),
            },
        );
        Ok(())
    }

    pub(super) fn set_ready(&self, player_id: &str) -> Result<(), AppError> {
        let (_, session) = self.seated(player_id)?;
        let mut guard = session.lock();
        guard.engine.set_ready(player_id)?;
        self.broadcast_state(&guard.engine);
        Ok(())
    }

    pub(super) fn set_rounds_to_win(&self, player_id: &str, value: u8) -> Result<(), AppError> {
        let (_, session) = self.seated(player_id)?;
        let mut guard = session.lock();
        guard.engine.set_rounds_to_win(value)?;
        self.broadcast_state(&guard.engine);
        Ok(())
    }

    pub(super) fn start_game(&self, player_id: &str) -> Result<(), AppError> {
        let (session_id, session) = self.seated(player_id)?;
        let mut guard = session.lock();
        Self::require_creator(&guard.engine, player_id, "start the game")?;
        let outcome = guard.engine.start_game()?;

        let hakem_name = guard
            .engine
            .hakem_id()
            .and_then(|id| guard.engine.player(id))
            .map(|p| p.name.clone())
            .unwrap_or_default();
        info!(session_id = %session_id, hakem = %hakem_name, "game started");
        self.notify(
            &session_id,
            &guard,
            NotableEvent::GameStarted {
                hakem_name,
                players: player_names(&guard.engine),
            },
        );

        match outcome {
            StartOutcome::HakemDetermined { hakem_id, draw } => {
                self.broadcast(
                    &guard.engine,
                    &ServerMsg::HakemDetermined {
                        hakem_id,
                        cards: draw,
                    },
                );
                self.broadcast_state(&guard.engine);
                self.schedule(
                    &guard,
                    ScheduledAction {
                        session_id,
                        expected_phase: PhaseKind::DeterminingHakem,
                        expected_actor: None,
                        delay: self.pacing.hakem_reveal,
                        follow_up: FollowUp::ProceedToDealing,
                    },
                );
            }
            StartOutcome::Dealt { .. } => self.after_deal(&session_id, &guard),
        }
        Ok(())
    }
}
