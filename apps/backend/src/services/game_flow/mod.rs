//! Game flow orchestration: turns client intents and timer firings into
//! engine calls, fans the results out to connections, and keeps automated
//! seats moving.
//!
//! Every call locks exactly one session and never awaits while holding it.
//! Frames for a session are therefore emitted in the order its state changed.

mod ai_coordinator;
mod broadcast;
mod player_actions;
mod round_lifecycle;
mod scheduler;
mod seats;

use std::sync::Arc;

use tracing::debug;

pub use ai_coordinator::SeatController;
pub use broadcast::Outbox;
pub use scheduler::{FollowUp, ScheduledAction};

use crate::ai::{AiFailureMode, AiPlayer, RandomPlayer};
use crate::config::Pacing;
use crate::domain::{Card, SeatAction};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::services::game_manager::{SessionId, SessionRegistry, SharedSession};
use crate::services::notifier::{GameNotifier, LogNotifier};
use crate::ws::protocol::{ClientMsg, ServerMsg};

#[derive(Clone)]
pub struct GameFlowService {
    registry: Arc<SessionRegistry>,
    outbox: Arc<dyn Outbox>,
    policy: Arc<dyn AiPlayer>,
    fallback: Arc<dyn AiPlayer>,
    failure_mode: AiFailureMode,
    pacing: Pacing,
    notifier: Arc<dyn GameNotifier>,
}

impl GameFlowService {
    pub fn new(
        registry: Arc<SessionRegistry>,
        outbox: Arc<dyn Outbox>,
        policy: Arc<dyn AiPlayer>,
        pacing: Pacing,
    ) -> Self {
        Self {
            registry,
            outbox,
            policy,
            fallback: Arc::new(RandomPlayer::new(None)),
            failure_mode: AiFailureMode::FallbackRandom,
            pacing,
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn GameNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_failure_mode(mut self, mode: AiFailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Apply one client intent. A rejected intent produces exactly one
    /// `error` frame, sent to `player_id` only.
    pub fn handle_intent(&self, player_id: &str, intent: ClientMsg) {
        let action = intent.action();
        if let Err(err) = self.dispatch(player_id, intent) {
            debug!(
                player_id,
                action,
                code = %err.code(),
                detail = %err.detail(),
                "intent rejected"
            );
            self.outbox.send(player_id, ServerMsg::from(&err));
        }
    }

    fn dispatch(&self, player_id: &str, intent: ClientMsg) -> Result<(), AppError> {
        match intent {
            ClientMsg::Create {
                player_name,
                external_id,
            } => self.create_session(player_id, &player_name, external_id),
            ClientMsg::Join {
                session_id,
                player_name,
                external_id,
            } => self.join_session(player_id, &session_id, &player_name, external_id),
            ClientMsg::Leave => self.leave(player_id),
            ClientMsg::Ready => self.set_ready(player_id),
            ClientMsg::SetRoundsToWin { value } => self.set_rounds_to_win(player_id, value),
            ClientMsg::StartGame => self.start_game(player_id),
            ClientMsg::AddBot => self.add_bot(player_id),
            ClientMsg::RemoveBot { bot_id } => self.remove_bot(player_id, &bot_id),
            ClientMsg::SelectHokm { suit } => {
                self.human_action(player_id, SeatAction::SelectHokm(suit))
            }
            ClientMsg::PlayCard { card_id } => {
                let card = card_id.parse::<Card>()?;
                self.human_action(player_id, SeatAction::PlayCard(card))
            }
        }
    }

    /// The caller's session, or NOT_PARTICIPANT.
    fn seated(&self, player_id: &str) -> Result<(SessionId, SharedSession), AppError> {
        self.registry.session_of(player_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, "You are not in a game").into()
        })
    }
}
