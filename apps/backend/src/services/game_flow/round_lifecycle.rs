use std::time::Duration;

use rand::Rng;
use tracing::info;

use super::{FollowUp, GameFlowService, ScheduledAction};
use crate::domain::engine::{DecisionKind, SeatOutcome};
use crate::domain::state::PhaseKind;
use crate::domain::SeatAction;
use crate::error::AppError;
use crate::services::game_manager::GameSession;
use crate::services::notifier::NotableEvent;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    /// Apply an action for a seat and emit everything it caused, in order.
    pub(super) fn apply_for_seat(
        &self,
        session_id: &str,
        session: &mut GameSession,
        player_id: &str,
        action: SeatAction,
    ) -> Result<(), AppError> {
        let outcome = session.engine.apply_seat_action(player_id, action)?;
        session.touch();

        match outcome {
            SeatOutcome::HokmSelected(suit) => {
                info!(session_id, player_id, ?suit, "hokm selected");
                self.broadcast(&session.engine, &ServerMsg::HokmSelected { suit });
                self.broadcast_state(&session.engine);
                self.announce_turn(session_id, session, false);
            }
            SeatOutcome::CardPlayed(play) => {
                let engine = &session.engine;
                self.broadcast(
                    engine,
                    &ServerMsg::CardPlayed {
                        player_id: play.player_id.clone(),
                        card: play.card,
                    },
                );
                if let Some(trick) = &play.trick {
                    self.broadcast(
                        engine,
                        &ServerMsg::TrickWon {
                            player_id: trick.winner_id.clone(),
                            team: trick.winner_team,
                        },
                    );
                }
                if let Some(round) = &play.round {
                    info!(
                        session_id,
                        winning_team = ?round.winning_team,
                        result = ?round.result,
                        points = round.points,
                        "round ended"
                    );
                    self.broadcast(
                        engine,
                        &ServerMsg::RoundEnd {
                            round_score: round.tricks,
                            game_score: engine.game_score(),
                            result: round.result,
                            points: round.points,
                        },
                    );
                    self.notify(
                        session_id,
                        session,
                        NotableEvent::RoundEnded {
                            winning_team: round.winning_team,
                            result: round.result,
                            points: round.points,
                            game_score: engine.game_score(),
                        },
                    );
                }
                if let Some(winner) = play.game_winner {
                    info!(session_id, ?winner, "game over");
                    self.broadcast(
                        engine,
                        &ServerMsg::GameEnd {
                            winning_team: winner,
                            final_score: engine.game_score(),
                        },
                    );
                    self.notify(
                        session_id,
                        session,
                        NotableEvent::GameEnded {
                            winning_team: winner,
                            game_score: engine.game_score(),
                        },
                    );
                }
                self.broadcast_state(engine);

                match engine.phase_kind() {
                    PhaseKind::RoundEnd => self.schedule(
                        session,
                        ScheduledAction {
                            session_id: session_id.to_string(),
                            expected_phase: PhaseKind::RoundEnd,
                            expected_actor: None,
                            delay: self.pacing.round_result,
                            follow_up: FollowUp::StartNextRound,
                        },
                    ),
                    PhaseKind::Playing => {
                        self.announce_turn(session_id, session, play.trick.is_some())
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Hands are out: state to everyone, the first five to the hakem, then
    /// wait on the hakem's choice.
    pub(super) fn after_deal(&self, session_id: &str, session: &GameSession) {
        let engine = &session.engine;
        self.broadcast_state(engine);
        if let Some(hakem_id) = engine.hakem_id() {
            let hakem = engine.player(hakem_id);
            if hakem.is_some_and(|p| !p.is_bot && p.is_connected) {
                let cards = engine.view_for(hakem_id).hakem_cards;
                self.send_to(hakem_id, ServerMsg::HakemCards { cards });
            }
        }
        self.schedule_autoplay(session_id, session, false);
    }

    /// Prompt whoever must act next; automated seats get a timer instead.
    pub(super) fn announce_turn(&self, session_id: &str, session: &GameSession, after_trick: bool) {
        if let Some(current) = session.engine.current_player_id() {
            let human = session
                .engine
                .player(current)
                .is_some_and(|p| !p.is_automated());
            if human {
                self.send_to(current, ServerMsg::YourTurn);
            }
        }
        self.schedule_autoplay(session_id, session, after_trick);
    }

    /// Arm a timer for the automated seat that owes a decision, if any.
    pub(super) fn schedule_autoplay(
        &self,
        session_id: &str,
        session: &GameSession,
        after_trick: bool,
    ) {
        let Some(pending) = session.engine.pending_automated_decision() else {
            return;
        };
        let (delay, follow_up, expected_phase) = match pending.kind {
            DecisionKind::ChooseHokm => (
                self.pacing.bot_trump,
                FollowUp::AutoSelectHokm,
                PhaseKind::ChoosingHokm,
            ),
            DecisionKind::PlayCard => (
                if after_trick {
                    self.pacing.trick_display
                } else {
                    self.think_time()
                },
                FollowUp::AutoPlayCard,
                PhaseKind::Playing,
            ),
        };
        self.schedule(
            session,
            ScheduledAction {
                session_id: session_id.to_string(),
                expected_phase,
                expected_actor: Some(pending.player_id),
                delay,
                follow_up,
            },
        );
    }

    fn think_time(&self) -> Duration {
        let min = self.pacing.bot_think_min.as_millis() as u64;
        let max = self.pacing.bot_think_max.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}
