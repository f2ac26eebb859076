//! Player view of a session: what one seat is allowed to see.
//!
//! [`GameView`] is the only engine state that leaves the process. It is built
//! by [`crate::domain::engine::HokmEngine::view_for`], which empties every hand
//! except the viewer's and exposes the hakem's first five cards only to the
//! hakem while hokm is being chosen.
//!
//! It is also the interface between the engine and autoplay: the policy in
//! [`crate::ai`] decides from a `GameView` plus the acting seat's hand, so a
//! bot sees exactly what a human in that seat would see.

use serde::Serialize;

use crate::domain::cards_logic::legal_plays;
use crate::domain::engine::HakemDraw;
use crate::domain::rules::RoundsToWin;
use crate::domain::scoring::RoundResult;
use crate::domain::state::{DealingStage, PhaseKind, PlayerId, Seat, Team, TeamScore};
use crate::domain::tricks::{CompletedTrick, Trick, TrickPlay};
use crate::domain::{Card, Suit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub position: Seat,
    pub team: Team,
    /// The viewer's own cards; empty for everyone else.
    pub hand: Vec<Card>,
    /// Public count of cards held.
    pub card_count: usize,
    pub is_ready: bool,
    pub is_connected: bool,
    pub is_bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: String,
    pub phase: PhaseKind,
    pub players: Vec<PlayerView>,
    pub hakem_id: Option<PlayerId>,
    pub hokm: Option<Suit>,
    pub current_trick: Trick,
    pub current_player_id: Option<PlayerId>,
    pub lead_player_id: Option<PlayerId>,
    pub last_trick: Option<CompletedTrick>,
    pub last_trick_winner: Option<PlayerId>,
    pub round_score: TeamScore,
    pub game_score: TeamScore,
    pub round_number: u32,
    pub trick_number: u8,
    pub rounds_to_win: RoundsToWin,
    pub winning_team: Option<Team>,
    /// Non-empty only for the hakem during `choosingHokm`.
    pub hakem_cards: Vec<Card>,
    pub dealing_stage: Option<DealingStage>,
    pub hakem_determination_cards: Vec<HakemDraw>,
    pub last_round_result: Option<RoundResult>,
    pub last_round_points: Option<u8>,
}

impl GameView {
    pub fn player(&self, id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn team_of(&self, id: &str) -> Option<Team> {
        self.player(id).map(|p| p.team)
    }

    /// Legal subset of `hand` against the current trick's lead suit.
    pub fn legal_plays(&self, hand: &[Card]) -> Vec<Card> {
        legal_plays(hand, self.current_trick.lead_suit)
    }

    /// The play currently winning the trick, if any card is down.
    pub fn best_play(&self) -> Option<&TrickPlay> {
        let hokm = self.hokm?;
        let idx = self.current_trick.best_index(hokm)?;
        self.current_trick.plays.get(idx)
    }
}
