//! The per-session Hokm state machine.
//!
//! Every operation validates first and mutates second, so a returned error
//! always leaves the engine exactly as it was. The engine is not thread-safe
//! on its own; the session registry serializes access behind one lock per
//! session.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::domain::cards_logic::{is_legal_play, sort_hand};
use crate::domain::dealing::{complete_deal, draw_hakem_spades, shuffled_deck, split_hakem_first};
use crate::domain::player_view::{GameView, PlayerView};
use crate::domain::rules::{RoundsToWin, PLAYERS, TRICKS_PER_ROUND, TRICKS_TO_WIN_ROUND};
use crate::domain::scoring::{classify_round, RoundOutcome};
use crate::domain::state::{
    next_seat, DealingStage, Phase, PhaseKind, Player, PlayerId, Seat, Team, TeamScore,
};
use crate::domain::tricks::{winning_index, CompletedTrick, Trick};
use crate::domain::{Card, Suit};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

/// One spade dealt during hakem determination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HakemDraw {
    pub player_id: PlayerId,
    pub card: Card,
}

/// What `remove_player` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Removed from the lobby; remaining seats renumbered.
    Removed,
    /// Play has started: the seat stays, flagged disconnected.
    MarkedDisconnected,
}

/// What `start_game` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// First round: spades drawn, phase is `determiningHakem`.
    HakemDetermined {
        hakem_id: PlayerId,
        draw: Vec<HakemDraw>,
    },
    /// Hakem already known: straight to the first deal.
    Dealt { hakem_id: PlayerId },
}

/// Result of a successful `play_card`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub player_id: PlayerId,
    pub card: Card,
    /// Set when this card completed the trick.
    pub trick: Option<CompletedTrick>,
    /// Set when the trick ended the round.
    pub round: Option<RoundOutcome>,
    /// Set when the round ended the game.
    pub game_winner: Option<Team>,
}

/// An action for a seat. The engine does not know whether a human or the
/// autoplay policy produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAction {
    SelectHokm(Suit),
    PlayCard(Card),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatOutcome {
    HokmSelected(Suit),
    CardPlayed(PlayOutcome),
}

/// The kind of decision awaited from a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    ChooseHokm,
    PlayCard,
}

/// A decision owed by an automated seat (bot, or disconnected human).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub player_id: PlayerId,
    pub kind: DecisionKind,
}

#[derive(Debug, Clone)]
pub struct HokmEngine {
    id: String,
    phase: Phase,
    players: Vec<Player>,
    hakem_id: Option<PlayerId>,
    hokm: Option<Suit>,
    current_player_id: Option<PlayerId>,
    lead_player_id: Option<PlayerId>,
    last_trick: Option<CompletedTrick>,
    round_score: TeamScore,
    game_score: TeamScore,
    round_number: u32,
    trick_number: u8,
    rounds_to_win: RoundsToWin,
    dealing_stage: Option<DealingStage>,
    hakem_draw: Vec<HakemDraw>,
    last_round: Option<RoundOutcome>,
    /// Cards already played this round, including the trick in progress.
    played: Vec<Card>,
    rng: ChaCha8Rng,
}

impl HokmEngine {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_rng(id.into(), ChaCha8Rng::from_os_rng())
    }

    /// Reproducible deals and draws.
    pub fn with_seed(id: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(id.into(), ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(id: String, rng: ChaCha8Rng) -> Self {
        Self {
            id,
            phase: Phase::Waiting,
            players: Vec::with_capacity(PLAYERS),
            hakem_id: None,
            hokm: None,
            current_player_id: None,
            lead_player_id: None,
            last_trick: None,
            round_score: TeamScore::default(),
            game_score: TeamScore::default(),
            round_number: 1,
            trick_number: 1,
            rounds_to_win: RoundsToWin::default(),
            dealing_stage: None,
            hakem_draw: Vec::new(),
            last_round: None,
            played: Vec::new(),
            rng,
        }
    }

    // ---- accessors -------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Roster in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn hakem_id(&self) -> Option<&str> {
        self.hakem_id.as_deref()
    }

    pub fn hokm(&self) -> Option<Suit> {
        self.hokm
    }

    pub fn current_player_id(&self) -> Option<&str> {
        self.current_player_id.as_deref()
    }

    pub fn round_score(&self) -> TeamScore {
        self.round_score
    }

    pub fn game_score(&self) -> TeamScore {
        self.game_score
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn trick_number(&self) -> u8 {
        self.trick_number
    }

    pub fn rounds_to_win(&self) -> RoundsToWin {
        self.rounds_to_win
    }

    pub fn dealing_stage(&self) -> Option<DealingStage> {
        self.dealing_stage
    }

    pub fn hakem_draw(&self) -> &[HakemDraw] {
        &self.hakem_draw
    }

    pub fn last_round(&self) -> Option<&RoundOutcome> {
        self.last_round.as_ref()
    }

    pub fn last_trick(&self) -> Option<&CompletedTrick> {
        self.last_trick.as_ref()
    }

    pub fn current_trick(&self) -> Option<&Trick> {
        match &self.phase {
            Phase::Playing { trick } => Some(trick),
            _ => None,
        }
    }

    pub fn winning_team(&self) -> Option<Team> {
        match self.phase {
            Phase::GameEnd { winner } => Some(winner),
            _ => None,
        }
    }

    /// Humans still attached to a live connection.
    pub fn connected_humans(&self) -> usize {
        self.players
            .iter()
            .filter(|p| !p.is_bot && p.is_connected)
            .count()
    }

    /// Every card accounted for this round: hands, cards played (including
    /// the trick in progress) and the held-back stock.
    pub fn card_ledger(&self) -> Vec<Card> {
        let mut all: Vec<Card> = self
            .players
            .iter()
            .flat_map(|p| p.hand.iter().copied())
            .collect();
        all.extend(self.played.iter().copied());
        if let Phase::ChoosingHokm { stock } = &self.phase {
            all.extend(stock.iter().copied());
        }
        all
    }

    // ---- roster ----------------------------------------------------------

    /// Seat a human at the next free position.
    pub fn add_player(
        &mut self,
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        external_id: Option<String>,
    ) -> Result<&Player, DomainError> {
        let id = id.into();
        if self.players.len() >= PLAYERS {
            return Err(DomainError::conflict(
                ConflictKind::SeatFull,
                "Game is full",
            ));
        }
        self.require_waiting("add_player")?;
        if self.player(&id).is_some() {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInSession,
                "Player is already seated",
            ));
        }

        let seat = self.players.len() as Seat;
        self.players
            .push(Player::human(id, name.into(), external_id, seat));
        Ok(&self.players[seat as usize])
    }

    /// In the lobby: remove and close the gap. Once play has started: keep
    /// the seat and mark it disconnected.
    pub fn remove_player(&mut self, id: &str) -> Result<RemovalOutcome, DomainError> {
        let idx = self.seat_index(id)?;
        if self.phase == Phase::Waiting {
            self.players.remove(idx);
            self.renumber();
            Ok(RemovalOutcome::Removed)
        } else {
            self.players[idx].is_connected = false;
            Ok(RemovalOutcome::MarkedDisconnected)
        }
    }

    /// Add an always-ready bot to the lobby.
    pub fn add_bot(&mut self) -> Result<&Player, DomainError> {
        if self.players.len() >= PLAYERS {
            return Err(DomainError::conflict(
                ConflictKind::SeatFull,
                "Game is full",
            ));
        }
        self.require_waiting("add_bot")?;

        let bot_number = self.players.iter().filter(|p| p.is_bot).count() + 1;
        let id = loop {
            let candidate = format!("bot_{:08x}", self.rng.random::<u32>());
            if self.player(&candidate).is_none() {
                break candidate;
            }
        };
        let seat = self.players.len() as Seat;
        self.players
            .push(Player::bot(id, format!("Bot {bot_number}"), seat));
        Ok(&self.players[seat as usize])
    }

    pub fn remove_bot(&mut self, id: &str) -> Result<(), DomainError> {
        self.require_waiting("remove_bot")?;
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id && p.is_bot)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Bot, format!("No bot {id}")))?;
        self.players.remove(idx);
        self.renumber();
        Ok(())
    }

    /// Hand a seat to autoplay for the rest of the game. Position, team and
    /// hand are untouched. Idempotent.
    pub fn replace_with_bot(&mut self, id: &str) -> Result<&Player, DomainError> {
        if self.phase == Phase::Waiting {
            return Err(DomainError::wrong_phase(
                "Cannot replace a player before the game starts",
            ));
        }
        let idx = self.seat_index(id)?;
        let player = &mut self.players[idx];
        if !player.is_bot {
            player.is_bot = true;
            player.is_connected = true;
            player.name = format!("Bot ({})", player.name);
        }
        Ok(&self.players[idx])
    }

    pub fn set_ready(&mut self, id: &str) -> Result<(), DomainError> {
        self.require_waiting("set_ready")?;
        let idx = self.seat_index(id)?;
        self.players[idx].is_ready = true;
        Ok(())
    }

    pub fn set_rounds_to_win(&mut self, n: u8) -> Result<(), DomainError> {
        self.require_waiting("set_rounds_to_win")?;
        self.rounds_to_win = RoundsToWin::try_from(n)?;
        Ok(())
    }

    // ---- game flow -------------------------------------------------------

    /// Requires a full, ready table. On the first round the hakem is drawn;
    /// otherwise the first deal happens immediately.
    pub fn start_game(&mut self) -> Result<StartOutcome, DomainError> {
        self.require_waiting("start_game")?;
        if self.players.len() != PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::PlayersNotReady,
                format!("Need {PLAYERS} players to start"),
            ));
        }
        if !self.players.iter().all(|p| p.is_ready) {
            return Err(DomainError::validation(
                ValidationKind::PlayersNotReady,
                "All players must be ready",
            ));
        }

        if let Some(hakem_id) = self.hakem_id.clone() {
            let hakem_seat = self.seat_index(&hakem_id)?;
            self.deal_first_stage(hakem_seat);
            return Ok(StartOutcome::Dealt { hakem_id });
        }

        let spades = draw_hakem_spades(&mut self.rng);
        let draw: Vec<HakemDraw> = self
            .players
            .iter()
            .zip(spades)
            .map(|(p, card)| HakemDraw {
                player_id: p.id.clone(),
                card,
            })
            .collect();
        let hakem_id = draw
            .iter()
            .min_by_key(|d| d.card.rank)
            .map(|d| d.player_id.clone())
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::InvariantViolated, "empty hakem draw")
            })?;

        self.hakem_draw = draw.clone();
        self.hakem_id = Some(hakem_id.clone());
        self.phase = Phase::DeterminingHakem;
        Ok(StartOutcome::HakemDetermined { hakem_id, draw })
    }

    /// Leave the hakem reveal and deal the hakem's first five cards.
    pub fn proceed_to_dealing(&mut self) -> Result<(), DomainError> {
        if self.phase != Phase::DeterminingHakem {
            return Err(DomainError::wrong_phase(format!(
                "proceed_to_dealing in {}",
                self.phase_kind()
            )));
        }
        let hakem_seat = self.hakem_seat()?;
        self.deal_first_stage(hakem_seat);
        Ok(())
    }

    /// The hakem commits the trump suit; the rest of the deck is dealt and
    /// play begins with the hakem on lead.
    pub fn select_hokm(&mut self, player_id: &str, suit: Suit) -> Result<(), DomainError> {
        let Phase::ChoosingHokm { stock } = &self.phase else {
            return Err(DomainError::wrong_phase(format!(
                "select_hokm in {}",
                self.phase_kind()
            )));
        };
        self.seat_index(player_id)?;
        let hakem_seat = self.hakem_seat()?;
        if self.players[hakem_seat].id != player_id {
            return Err(DomainError::validation(
                ValidationKind::NotParticipant,
                "Only the hakem can choose hokm",
            ));
        }

        let mut hands: [Vec<Card>; PLAYERS] =
            std::array::from_fn(|i| self.players[i].hand.clone());
        complete_deal(stock, &mut hands, hakem_seat as Seat)?;

        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.hand = hand;
        }
        let hakem_id = self.players[hakem_seat].id.clone();
        self.hokm = Some(suit);
        self.dealing_stage = Some(DealingStage::Complete);
        self.phase = Phase::Playing { trick: Trick::new() };
        self.trick_number = 1;
        self.current_player_id = Some(hakem_id.clone());
        self.lead_player_id = Some(hakem_id);
        Ok(())
    }

    /// Play a card for the current player, resolving the trick, the round
    /// and the game as they complete.
    pub fn play_card(&mut self, player_id: &str, card: Card) -> Result<PlayOutcome, DomainError> {
        let Phase::Playing { trick } = &self.phase else {
            return Err(DomainError::wrong_phase(format!(
                "play_card in {}",
                self.phase_kind()
            )));
        };
        let lead = trick.lead_suit;
        let seat = self.seat_index(player_id)?;
        if self.current_player_id.as_deref() != Some(player_id) {
            return Err(DomainError::validation(
                ValidationKind::NotYourTurn,
                "Not your turn",
            ));
        }
        let hand = &self.players[seat].hand;
        let Some(pos) = hand.iter().position(|&c| c == card) else {
            return Err(DomainError::validation(
                ValidationKind::IllegalCard,
                "Card not in hand",
            ));
        };
        if !is_legal_play(hand, card, lead) {
            return Err(DomainError::validation(
                ValidationKind::IllegalCard,
                "Must follow the lead suit",
            ));
        }
        let hokm = self.hokm.ok_or_else(|| {
            DomainError::validation(ValidationKind::InvariantViolated, "playing without hokm")
        })?;
        let hakem_team = Team::of_seat(self.hakem_seat()? as Seat);

        // Validated; mutate.
        self.players[seat].hand.remove(pos);
        self.played.push(card);
        let player_id = player_id.to_string();
        let mut outcome = PlayOutcome {
            player_id: player_id.clone(),
            card,
            trick: None,
            round: None,
            game_winner: None,
        };

        let Phase::Playing { trick } = &mut self.phase else {
            return Ok(outcome);
        };
        trick.push(player_id, card);
        if !trick.is_complete() {
            let next = next_seat(seat as Seat) as usize;
            self.current_player_id = Some(self.players[next].id.clone());
            return Ok(outcome);
        }

        let trick = std::mem::take(trick);
        let lead = trick.lead_suit.unwrap_or(card.suit);
        let winner_idx = winning_index(&trick.plays, lead, hokm).unwrap_or(0);
        let winner_id = trick.plays[winner_idx].player_id.clone();
        let winner_team = self
            .player(&winner_id)
            .map(Player::team)
            .unwrap_or(hakem_team);
        let completed = CompletedTrick {
            plays: trick.plays,
            lead_suit: lead,
            winner_id: winner_id.clone(),
            winner_team,
        };
        self.round_score.add(winner_team, 1);
        self.trick_number += 1;
        self.last_trick = Some(completed.clone());
        outcome.trick = Some(completed);

        let round_over = self.round_score.team1 >= TRICKS_TO_WIN_ROUND
            || self.round_score.team2 >= TRICKS_TO_WIN_ROUND
            || self.trick_number > TRICKS_PER_ROUND;
        if !round_over {
            if let Phase::Playing { trick } = &mut self.phase {
                *trick = Trick::new();
            }
            self.current_player_id = Some(winner_id.clone());
            self.lead_player_id = Some(winner_id);
            return Ok(outcome);
        }

        let round = classify_round(self.round_score, hakem_team);
        self.game_score.add(round.winning_team, round.points);
        self.last_round = Some(round);
        self.current_player_id = None;
        outcome.round = Some(round);
        if self.game_score.get(round.winning_team) >= self.rounds_to_win.value() {
            self.phase = Phase::GameEnd {
                winner: round.winning_team,
            };
            outcome.game_winner = Some(round.winning_team);
        } else {
            self.phase = Phase::RoundEnd;
        }
        Ok(outcome)
    }

    /// Pass the hakem role if the hakem's team lost, reset the round and deal
    /// the new hakem's first five cards.
    pub fn start_next_round(&mut self) -> Result<(), DomainError> {
        if self.phase != Phase::RoundEnd {
            return Err(DomainError::wrong_phase(format!(
                "start_next_round in {}",
                self.phase_kind()
            )));
        }
        let winning_team = self.last_round.map(|r| r.winning_team).ok_or_else(|| {
            DomainError::validation(ValidationKind::InvariantViolated, "round ended without result")
        })?;
        let mut hakem_seat = self.hakem_seat()?;
        if Team::of_seat(hakem_seat as Seat) != winning_team {
            hakem_seat = next_seat(hakem_seat as Seat) as usize;
            self.hakem_id = Some(self.players[hakem_seat].id.clone());
        }

        self.round_number += 1;
        self.hakem_draw.clear();
        self.last_round = None;
        self.deal_first_stage(hakem_seat);
        Ok(())
    }

    /// Apply an action for a seat, regardless of who decided it.
    pub fn apply_seat_action(
        &mut self,
        player_id: &str,
        action: SeatAction,
    ) -> Result<SeatOutcome, DomainError> {
        match action {
            SeatAction::SelectHokm(suit) => {
                self.select_hokm(player_id, suit)?;
                Ok(SeatOutcome::HokmSelected(suit))
            }
            SeatAction::PlayCard(card) => {
                Ok(SeatOutcome::CardPlayed(self.play_card(player_id, card)?))
            }
        }
    }

    /// The decision currently owed by an automated seat, if any.
    pub fn pending_automated_decision(&self) -> Option<PendingDecision> {
        let (player_id, kind) = match &self.phase {
            Phase::ChoosingHokm { .. } => (self.hakem_id.as_deref()?, DecisionKind::ChooseHokm),
            Phase::Playing { .. } => (self.current_player_id.as_deref()?, DecisionKind::PlayCard),
            _ => return None,
        };
        let player = self.player(player_id)?;
        player.is_automated().then(|| PendingDecision {
            player_id: player.id.clone(),
            kind,
        })
    }

    // ---- views -----------------------------------------------------------

    /// Redacted copy of the session for one viewer. Other players' hands are
    /// always empty; the hakem's first cards appear only for the hakem while
    /// hokm is being chosen.
    pub fn view_for(&self, viewer_id: &str) -> GameView {
        let players = self
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id.clone(),
                name: p.name.clone(),
                position: p.seat,
                team: p.team(),
                hand: if p.id == viewer_id {
                    p.hand.clone()
                } else {
                    Vec::new()
                },
                card_count: p.hand.len(),
                is_ready: p.is_ready,
                is_connected: p.is_connected,
                is_bot: p.is_bot,
            })
            .collect();

        let hakem_cards = match (&self.phase, self.hakem_id.as_deref()) {
            (Phase::ChoosingHokm { .. }, Some(hakem)) if hakem == viewer_id => self
                .player(hakem)
                .map(|p| p.hand.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        GameView {
            id: self.id.clone(),
            phase: self.phase_kind(),
            players,
            hakem_id: self.hakem_id.clone(),
            hokm: self.hokm,
            current_trick: self.current_trick().cloned().unwrap_or_default(),
            current_player_id: self.current_player_id.clone(),
            lead_player_id: self.lead_player_id.clone(),
            last_trick: self.last_trick.clone(),
            last_trick_winner: self.last_trick.as_ref().map(|t| t.winner_id.clone()),
            round_score: self.round_score,
            game_score: self.game_score,
            round_number: self.round_number,
            trick_number: self.trick_number,
            rounds_to_win: self.rounds_to_win,
            winning_team: self.winning_team(),
            hakem_cards,
            dealing_stage: self.dealing_stage,
            hakem_determination_cards: self.hakem_draw.clone(),
            last_round_result: self.last_round.map(|r| r.result),
            last_round_points: self.last_round.map(|r| r.points),
        }
    }

    // ---- internals -------------------------------------------------------

    fn require_waiting(&self, op: &str) -> Result<(), DomainError> {
        if self.phase == Phase::Waiting {
            Ok(())
        } else {
            Err(DomainError::wrong_phase(format!(
                "{op} is only allowed while waiting (phase: {})",
                self.phase_kind()
            )))
        }
    }

    fn seat_index(&self, id: &str) -> Result<usize, DomainError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "Not seated in this game"))
    }

    fn hakem_seat(&self) -> Result<usize, DomainError> {
        let hakem = self.hakem_id.as_deref().ok_or_else(|| {
            DomainError::validation(ValidationKind::InvariantViolated, "no hakem assigned")
        })?;
        self.seat_index(hakem)
    }

    fn renumber(&mut self) {
        for (i, p) in self.players.iter_mut().enumerate() {
            p.seat = i as Seat;
        }
    }

    /// Reset round state and give the hakem the top five cards of a fresh
    /// shuffle. Callers have already validated the transition.
    fn deal_first_stage(&mut self, hakem_seat: usize) {
        for p in self.players.iter_mut() {
            p.hand.clear();
        }
        let (mut first, stock) = split_hakem_first(shuffled_deck(&mut self.rng));
        sort_hand(&mut first);
        self.players[hakem_seat].hand = first;

        let hakem_id = self.players[hakem_seat].id.clone();
        self.phase = Phase::ChoosingHokm { stock };
        self.dealing_stage = Some(DealingStage::HakemFirst5);
        self.hokm = None;
        self.round_score = TeamScore::default();
        self.trick_number = 1;
        self.played.clear();
        self.last_trick = None;
        self.lead_player_id = None;
        self.current_player_id = Some(hakem_id);
    }
}

#[cfg(test)]
impl HokmEngine {
    /// Jump straight into a round with fixed hands.
    pub(crate) fn rig_round(
        &mut self,
        hands: [Vec<Card>; PLAYERS],
        hakem_seat: Seat,
        hokm: Suit,
    ) {
        for (p, hand) in self.players.iter_mut().zip(hands) {
            p.hand = hand;
            p.is_ready = true;
        }
        let hakem_id = self.players[hakem_seat as usize].id.clone();
        self.hakem_id = Some(hakem_id.clone());
        self.hokm = Some(hokm);
        self.phase = Phase::Playing { trick: Trick::new() };
        self.dealing_stage = Some(DealingStage::Complete);
        self.round_score = TeamScore::default();
        self.trick_number = 1;
        self.played.clear();
        self.current_player_id = Some(hakem_id.clone());
        self.lead_player_id = Some(hakem_id);
    }
}
