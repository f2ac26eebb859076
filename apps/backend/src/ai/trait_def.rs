//! Autoplay trait definition.

use std::fmt;

use crate::domain::{Card, GameView, Suit};
use crate::error::AppError;

/// Errors that can occur during autoplay decision-making.
#[derive(Debug)]
pub enum AiError {
    /// The policy had nothing legal to choose from
    InvalidMove(String),
    /// The policy encountered an internal error
    Internal(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::InvalidMove(msg) => write!(f, "AI invalid move: {msg}"),
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(format!("AI error: {err}"))
    }
}

/// Decision policy for a seat the engine reports as automated.
///
/// Implementations are stateless: every input they may use is passed in, and
/// `view` is the same redacted view a human in that seat would receive.
pub trait AiPlayer: Send + Sync {
    /// Choose hokm from the hakem's first five cards.
    fn choose_trump(&self, hand: &[Card]) -> Result<Suit, AiError>;

    /// Choose a legal card for `player_id`, whose cards are `hand`.
    fn choose_play(&self, hand: &[Card], view: &GameView, player_id: &str)
        -> Result<Card, AiError>;
}
