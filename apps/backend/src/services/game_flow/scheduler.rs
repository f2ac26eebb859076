//! Delayed follow-ups: hakem reveal, next round, automated seats.
//!
//! A timer never carries engine state. When it fires it looks the session up
//! again and checks that the phase and the actor it was armed for still hold;
//! otherwise it does nothing.

use std::time::Duration;

use tracing::{debug, error};

use super::GameFlowService;
use crate::domain::engine::HokmEngine;
use crate::domain::state::{PhaseKind, PlayerId};
use crate::error::AppError;
use crate::services::game_manager::{GameSession, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    ProceedToDealing,
    StartNextRound,
    AutoSelectHokm,
    AutoPlayCard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAction {
    pub session_id: SessionId,
    pub expected_phase: PhaseKind,
    /// Seat that must still be on the move, for autoplay follow-ups.
    pub expected_actor: Option<PlayerId>,
    pub delay: Duration,
    pub follow_up: FollowUp,
}

impl ScheduledAction {
    /// Whether the session is still in the state this action was armed for.
    pub fn is_current(&self, engine: &HokmEngine) -> bool {
        if engine.phase_kind() != self.expected_phase {
            return false;
        }
        match &self.expected_actor {
            None => true,
            Some(actor) => engine
                .pending_automated_decision()
                .is_some_and(|d| &d.player_id == actor),
        }
    }
}

impl GameFlowService {
    pub(super) fn schedule(&self, session: &GameSession, action: ScheduledAction) {
        let token = session.timer_token();
        let flow = self.clone();
        debug!(
            session_id = %action.session_id,
            follow_up = ?action.follow_up,
            delay_ms = action.delay.as_millis() as u64,
            "scheduled"
        );
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(session_id = %action.session_id, follow_up = ?action.follow_up, "timer cancelled");
                }
                _ = tokio::time::sleep(action.delay) => flow.fire(action),
            }
        });
    }

    fn fire(&self, action: ScheduledAction) {
        let Ok(session) = self.registry.lookup(&action.session_id) else {
            debug!(session_id = %action.session_id, "timer fired for a destroyed session");
            return;
        };
        let mut guard = session.lock();
        if !action.is_current(&guard.engine) {
            debug!(
                session_id = %action.session_id,
                follow_up = ?action.follow_up,
                phase = ?guard.engine.phase_kind(),
                "stale timer ignored"
            );
            return;
        }
        if let Err(err) = self.run_follow_up(&action, &mut guard) {
            error!(
                session_id = %action.session_id,
                follow_up = ?action.follow_up,
                error = %err,
                "follow-up failed"
            );
        }
    }

    fn run_follow_up(
        &self,
        action: &ScheduledAction,
        session: &mut GameSession,
    ) -> Result<(), AppError> {
        let session_id = action.session_id.as_str();
        match action.follow_up {
            FollowUp::ProceedToDealing => {
                session.engine.proceed_to_dealing()?;
                self.after_deal(session_id, session);
            }
            FollowUp::StartNextRound => {
                session.engine.start_next_round()?;
                self.after_deal(session_id, session);
            }
            FollowUp::AutoSelectHokm | FollowUp::AutoPlayCard => {
                self.autoplay(session_id, session)?;
            }
        }
        session.touch();
        Ok(())
    }
}
