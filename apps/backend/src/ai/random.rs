//! Random AI player: uniform choice among legal moves.
//!
//! Used as the fallback when the main policy fails, and as a baseline in
//! property tests. Seeded construction gives reproducible sequences.

use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::trait_def::{AiError, AiPlayer};
use crate::domain::{Card, GameView, Suit};

pub struct RandomPlayer {
    /// `AiPlayer` takes `&self`; the RNG needs interior mutability.
    rng: Mutex<ChaCha8Rng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    /// `Some(seed)` for reproducible play, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_trump(&self, _hand: &[Card]) -> Result<Suit, AiError> {
        let mut rng = self.rng.lock();
        Suit::ALL
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::Internal("no suits".into()))
    }

    fn choose_play(
        &self,
        hand: &[Card],
        view: &GameView,
        _player_id: &str,
    ) -> Result<Card, AiError> {
        let legal = view.legal_plays(hand);
        if legal.is_empty() {
            return Err(AiError::InvalidMove("No legal plays available".into()));
        }
        let mut rng = self.rng.lock();
        legal
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::Internal("Failed to choose from legal plays".into()))
    }
}
