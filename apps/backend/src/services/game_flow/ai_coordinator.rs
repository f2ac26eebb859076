//! Decisions for seats: relayed from a connected human, or produced by the
//! autoplay policy when the engine reports the seat as automated.

use tracing::{debug, error};

use super::GameFlowService;
use crate::ai::{AiFailureMode, AiPlayer};
use crate::domain::engine::{DecisionKind, HokmEngine};
use crate::domain::SeatAction;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::game_manager::GameSession;

/// Who decides for a seat on this step.
pub enum SeatController<'a> {
    /// A connected human sent this action.
    HumanRelay(SeatAction),
    /// The policy decides; `fallback` covers policy failures.
    Autoplay {
        policy: &'a dyn AiPlayer,
        fallback: Option<&'a dyn AiPlayer>,
    },
}

impl SeatController<'_> {
    pub fn decide(&self, engine: &HokmEngine, player_id: &str) -> Result<SeatAction, AppError> {
        match self {
            SeatController::HumanRelay(action) => {
                let automated = engine
                    .player(player_id)
                    .is_some_and(|p| p.is_automated());
                if automated {
                    return Err(DomainError::validation(
                        ValidationKind::NotParticipant,
                        "Seat is under bot control",
                    )
                    .into());
                }
                Ok(*action)
            }
            SeatController::Autoplay { policy, fallback } => {
                let decision = engine
                    .pending_automated_decision()
                    .filter(|d| d.player_id == player_id)
                    .ok_or_else(|| {
                        AppError::internal(format!("No automated decision owed by {player_id}"))
                    })?;
                match choose(*policy, engine, player_id, decision.kind) {
                    Ok(action) => Ok(action),
                    Err(err) => {
                        let Some(fallback) = fallback else {
                            return Err(err);
                        };
                        error!(player_id, error = %err, "policy failed, using fallback");
                        choose(*fallback, engine, player_id, decision.kind)
                    }
                }
            }
        }
    }
}

fn choose(
    policy: &dyn AiPlayer,
    engine: &HokmEngine,
    player_id: &str,
    kind: DecisionKind,
) -> Result<SeatAction, AppError> {
    let view = engine.view_for(player_id);
    let hand = view
        .player(player_id)
        .map(|p| p.hand.clone())
        .unwrap_or_default();
    let action = match kind {
        DecisionKind::ChooseHokm => SeatAction::SelectHokm(policy.choose_trump(&hand)?),
        DecisionKind::PlayCard => SeatAction::PlayCard(policy.choose_play(&hand, &view, player_id)?),
    };
    Ok(action)
}

impl GameFlowService {
    fn controller(&self) -> SeatController<'_> {
        SeatController::Autoplay {
            policy: self.policy.as_ref(),
            fallback: match self.failure_mode {
                AiFailureMode::FallbackRandom => Some(self.fallback.as_ref()),
                AiFailureMode::Propagate => None,
            },
        }
    }

    /// Take the step owed by the automated seat, if there is one.
    pub(super) fn autoplay(
        &self,
        session_id: &str,
        session: &mut GameSession,
    ) -> Result<(), AppError> {
        let Some(pending) = session.engine.pending_automated_decision() else {
            debug!(session_id, "no automated decision pending");
            return Ok(());
        };
        let action = self
            .controller()
            .decide(&session.engine, &pending.player_id)?;
        debug!(session_id, player_id = %pending.player_id, ?action, "autoplay");
        self.apply_for_seat(session_id, session, &pending.player_id, action)
    }

    /// A human's hokm choice or card.
    pub(super) fn human_action(&self, player_id: &str, action: SeatAction) -> Result<(), AppError> {
        let (session_id, session) = self.seated(player_id)?;
        let mut guard = session.lock();
        let action = SeatController::HumanRelay(action).decide(&guard.engine, player_id)?;
        self.apply_for_seat(&session_id, &mut guard, player_id, action)
    }
}
