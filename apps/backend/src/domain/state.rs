//! Roster, team and phase types shared by the engine and its views.

use serde::Serialize;

use crate::domain::rules::PLAYERS;
use crate::domain::tricks::Trick;
use crate::domain::Card;

/// Connection-derived player identity (bots use `bot_<hex>`).
pub type PlayerId = String;
/// Table position 0..=3.
pub type Seat = u8;

/// Partnerships: even seats form team 1, odd seats team 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Team {
    Team1,
    Team2,
}

impl Team {
    pub const fn of_seat(seat: Seat) -> Self {
        if seat % 2 == 0 {
            Team::Team1
        } else {
            Team::Team2
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Team::Team1 => Team::Team2,
            Team::Team2 => Team::Team1,
        }
    }
}

/// Per-team counter used for both tricks-this-round and game points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamScore {
    pub team1: u8,
    pub team2: u8,
}

impl TeamScore {
    pub const fn get(&self, team: Team) -> u8 {
        match team {
            Team::Team1 => self.team1,
            Team::Team2 => self.team2,
        }
    }

    pub fn add(&mut self, team: Team, n: u8) {
        match team {
            Team::Team1 => self.team1 += n,
            Team::Team2 => self.team2 += n,
        }
    }

    /// Team strictly ahead, if any.
    pub fn leader(&self) -> Option<Team> {
        match self.team1.cmp(&self.team2) {
            std::cmp::Ordering::Greater => Some(Team::Team1),
            std::cmp::Ordering::Less => Some(Team::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub external_id: Option<String>,
    pub seat: Seat,
    pub hand: Vec<Card>,
    pub is_ready: bool,
    pub is_connected: bool,
    pub is_bot: bool,
}

impl Player {
    pub fn human(id: PlayerId, name: String, external_id: Option<String>, seat: Seat) -> Self {
        Self {
            id,
            name,
            external_id,
            seat,
            hand: Vec::new(),
            is_ready: false,
            is_connected: true,
            is_bot: false,
        }
    }

    pub fn bot(id: PlayerId, name: String, seat: Seat) -> Self {
        Self {
            id,
            name,
            external_id: None,
            seat,
            hand: Vec::new(),
            is_ready: true,
            is_connected: true,
            is_bot: true,
        }
    }

    /// Derived from the seat; never stored.
    pub const fn team(&self) -> Team {
        Team::of_seat(self.seat)
    }

    /// Whether decisions for this seat come from the autoplay policy.
    pub const fn is_automated(&self) -> bool {
        self.is_bot || !self.is_connected
    }
}

/// Next actor counter-clockwise: 0 -> 3 -> 2 -> 1 -> 0.
pub const fn next_seat(seat: Seat) -> Seat {
    (seat + 3) % PLAYERS as u8
}

/// Traversal order starting from `start`, following [`next_seat`].
pub fn seats_from(start: Seat) -> [Seat; PLAYERS] {
    let mut order = [start; PLAYERS];
    for i in 1..PLAYERS {
        order[i] = next_seat(order[i - 1]);
    }
    order
}

/// Stage of the two-part deal within the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DealingStage {
    /// Only the hakem holds cards (5); the rest of the deck is held back.
    HakemFirst5,
    /// Hokm chosen; every hand filled to 13.
    Complete,
}

/// Session state machine. Payload lives on the variant that owns it.
///
/// Dealing has no variant of its own: `proceed_to_dealing` and
/// `start_next_round` shuffle and deal the hakem's five cards in one step
/// and land directly in `ChoosingHokm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    /// Spades drawn and hakem chosen; waiting for `proceed_to_dealing`.
    DeterminingHakem,
    /// Hakem holds 5 cards; `stock` is the 47 held back for the second stage.
    ChoosingHokm { stock: Vec<Card> },
    Playing { trick: Trick },
    RoundEnd,
    GameEnd { winner: Team },
}

/// Payload-free mirror of [`Phase`] for the wire and for timer guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Waiting,
    DeterminingHakem,
    ChoosingHokm,
    Playing,
    RoundEnd,
    GameEnd,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Waiting => PhaseKind::Waiting,
            Phase::DeterminingHakem => PhaseKind::DeterminingHakem,
            Phase::ChoosingHokm { .. } => PhaseKind::ChoosingHokm,
            Phase::Playing { .. } => PhaseKind::Playing,
            Phase::RoundEnd => PhaseKind::RoundEnd,
            Phase::GameEnd { .. } => PhaseKind::GameEnd,
        }
    }
}

impl PhaseKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Waiting => "waiting",
            PhaseKind::DeterminingHakem => "determiningHakem",
            PhaseKind::ChoosingHokm => "choosingHokm",
            PhaseKind::Playing => "playing",
            PhaseKind::RoundEnd => "roundEnd",
            PhaseKind::GameEnd => "gameEnd",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
