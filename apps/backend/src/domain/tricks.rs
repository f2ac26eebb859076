use serde::Serialize;

use crate::domain::cards_logic::card_value;
use crate::domain::rules::PLAYERS;
use crate::domain::state::{PlayerId, Team};
use crate::domain::{Card, Suit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickPlay {
    pub player_id: PlayerId,
    pub card: Card,
}

/// The trick in progress: up to four plays; the lead suit is fixed by the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trick {
    pub plays: Vec<TrickPlay>,
    pub lead_suit: Option<Suit>,
}

impl Trick {
    pub fn new() -> Self {
        Self {
            plays: Vec::with_capacity(PLAYERS),
            lead_suit: None,
        }
    }

    pub fn push(&mut self, player_id: PlayerId, card: Card) {
        if self.plays.is_empty() {
            self.lead_suit = Some(card.suit);
        }
        self.plays.push(TrickPlay { player_id, card });
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == PLAYERS
    }

    /// Index of the currently strongest play, if any card has been played.
    pub fn best_index(&self, hokm: Suit) -> Option<usize> {
        let lead = self.lead_suit?;
        winning_index(&self.plays, lead, hokm)
    }
}

/// A resolved trick kept for display after it leaves the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTrick {
    pub plays: Vec<TrickPlay>,
    pub lead_suit: Suit,
    pub winner_id: PlayerId,
    pub winner_team: Team,
}

/// Index of the play with the highest [`card_value`]. The first play wins ties,
/// which cannot occur among distinct cards.
pub fn winning_index(plays: &[TrickPlay], lead: Suit, hokm: Suit) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (i, play) in plays.iter().enumerate() {
        let value = card_value(play.card, lead, hokm);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}
