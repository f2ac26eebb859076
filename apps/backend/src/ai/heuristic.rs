//! HokmBot: the rule-of-thumb autoplay policy.
//!
//! Trump selection:
//! - Score each suit as `count * 15 + sum of rank values`; the first suit in
//!   enumeration order reaching the best score wins.
//!
//! Play strategy (partnership aware):
//! - One legal card: play it.
//! - On lead: shed a weak (< 10) non-hokm singleton (not when aggressive),
//!   else cash a non-hokm ace, else a non-hokm king when aggressive, else the
//!   median non-hokm card; with only hokm left, the lowest hokm.
//! - Last to act: the cheapest winning card, else the lowest legal card.
//! - Second or third: if the partner is winning, play low. Otherwise overtake
//!   as cheaply as possible (aggressive second hand overtakes with its
//!   strongest winner); unable to follow or win, trump in low before the last
//!   seat; otherwise play low.
//!
//! All "lowest"/"highest" comparisons use rank value only and keep the first
//! card on ties.
//!
//! Determinism: no randomness; the same inputs always give the same card.

use std::str::FromStr;

use crate::ai::{AiError, AiPlayer};
use crate::domain::cards_logic::card_value;
use crate::domain::tricks::TrickPlay;
use crate::domain::{Card, GameView, Rank, Suit};

/// How readily the bot spends high cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayStyle {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
}

impl PlayStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayStyle::Aggressive => "aggressive",
            PlayStyle::Defensive => "defensive",
            PlayStyle::Balanced => "balanced",
        }
    }
}

impl FromStr for PlayStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aggressive" => Ok(PlayStyle::Aggressive),
            "defensive" => Ok(PlayStyle::Defensive),
            "balanced" => Ok(PlayStyle::Balanced),
            other => Err(format!("unknown bot style '{other}'")),
        }
    }
}

/// Rank value below which a singleton is worth shedding on lead.
const WEAK_SINGLETON_BELOW: u8 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct HokmBot {
    style: PlayStyle,
}

impl HokmBot {
    pub const NAME: &'static str = "HokmBot";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(style: PlayStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> PlayStyle {
        self.style
    }

    // ---------- Utilities ----------

    fn lowest(cards: &[Card]) -> Option<Card> {
        cards
            .iter()
            .copied()
            .reduce(|low, c| if c.value() < low.value() { c } else { low })
    }

    fn highest(cards: &[Card]) -> Option<Card> {
        cards
            .iter()
            .copied()
            .reduce(|high, c| if c.value() > high.value() { c } else { high })
    }

    fn current_best(plays: &[TrickPlay], lead: Suit, hokm: Suit) -> Option<&TrickPlay> {
        let mut best: Option<(&TrickPlay, u8)> = None;
        for play in plays {
            let value = card_value(play.card, lead, hokm);
            match best {
                Some((_, v)) if value <= v => {}
                _ => best = Some((play, value)),
            }
        }
        best.map(|(p, _)| p)
    }

    fn winners(legal: &[Card], beat: u8, lead: Suit, hokm: Suit) -> Vec<Card> {
        legal
            .iter()
            .copied()
            .filter(|&c| card_value(c, lead, hokm) > beat)
            .collect()
    }

    // ---------- Decisions ----------

    fn lead_card(&self, hand: &[Card], hokm: Suit) -> Option<Card> {
        if self.style != PlayStyle::Aggressive {
            let weak_singleton = Suit::ALL
                .iter()
                .filter(|&&s| s != hokm)
                .filter_map(|&s| {
                    let mut in_suit = hand.iter().filter(|c| c.suit == s);
                    match (in_suit.next(), in_suit.next()) {
                        (Some(&only), None) => Some(only),
                        _ => None,
                    }
                })
                .find(|c| c.value() < WEAK_SINGLETON_BELOW);
            if weak_singleton.is_some() {
                return weak_singleton;
            }
        }

        let non_hokm: Vec<Card> = hand.iter().copied().filter(|c| c.suit != hokm).collect();
        if non_hokm.is_empty() {
            return Self::lowest(hand);
        }
        if let Some(&ace) = non_hokm.iter().find(|c| c.rank == Rank::Ace) {
            return Some(ace);
        }
        if self.style == PlayStyle::Aggressive {
            if let Some(&king) = non_hokm.iter().find(|c| c.rank == Rank::King) {
                return Some(king);
            }
        }
        let mut sorted = non_hokm;
        sorted.sort_by(|a, b| b.value().cmp(&a.value()));
        sorted.get(sorted.len() / 2).copied()
    }

    fn last_card(legal: &[Card], plays: &[TrickPlay], lead: Suit, hokm: Suit) -> Option<Card> {
        let best = Self::current_best(plays, lead, hokm)?;
        let beat = card_value(best.card, lead, hokm);
        Self::lowest(&Self::winners(legal, beat, lead, hokm)).or_else(|| Self::lowest(legal))
    }

    fn middle_card(
        &self,
        legal: &[Card],
        view: &GameView,
        player_id: &str,
        lead: Suit,
        hokm: Suit,
    ) -> Option<Card> {
        let plays = &view.current_trick.plays;
        let best = Self::current_best(plays, lead, hokm)?;
        let beat = card_value(best.card, lead, hokm);

        let my_team = view.team_of(player_id);
        if my_team.is_some() && my_team == view.team_of(&best.player_id) {
            return Self::lowest(legal);
        }

        let winners = Self::winners(legal, beat, lead, hokm);
        if !winners.is_empty() {
            if plays.len() == 1 && self.style == PlayStyle::Aggressive {
                return Self::highest(&winners);
            }
            return Self::lowest(&winners);
        }

        if !legal.iter().any(|c| c.suit == lead) && plays.len() < 3 {
            let trumps: Vec<Card> = legal.iter().copied().filter(|c| c.suit == hokm).collect();
            if let Some(low_trump) = Self::lowest(&trumps) {
                return Some(low_trump);
            }
        }
        Self::lowest(legal)
    }
}

impl AiPlayer for HokmBot {
    fn choose_trump(&self, hand: &[Card]) -> Result<Suit, AiError> {
        let mut best = Suit::Spades;
        let mut best_score = 0u32;
        for suit in Suit::ALL {
            let (count, strength) = hand
                .iter()
                .filter(|c| c.suit == suit)
                .fold((0u32, 0u32), |(n, s), c| (n + 1, s + u32::from(c.value())));
            let score = count * 15 + strength;
            if score > best_score {
                best_score = score;
                best = suit;
            }
        }
        Ok(best)
    }

    fn choose_play(
        &self,
        hand: &[Card],
        view: &GameView,
        player_id: &str,
    ) -> Result<Card, AiError> {
        let legal = view.legal_plays(hand);
        match legal.as_slice() {
            [] => return Err(AiError::InvalidMove("no legal card in hand".into())),
            [only] => return Ok(*only),
            _ => {}
        }
        let hokm = view
            .hokm
            .ok_or_else(|| AiError::Internal("card requested before hokm".into()))?;

        let plays = &view.current_trick.plays;
        let choice = match (view.current_trick.lead_suit, plays.len()) {
            (None, _) | (_, 0) => self.lead_card(hand, hokm),
            (Some(lead), 3) => Self::last_card(&legal, plays, lead, hokm),
            (Some(lead), _) => self.middle_card(&legal, view, player_id, lead, hokm),
        };

        match choice {
            Some(card) if legal.contains(&card) => Ok(card),
            Some(card) => Err(AiError::InvalidMove(format!("{card} is not legal"))),
            None => Err(AiError::Internal("no card selected".into())),
        }
    }
}
