//! AI player module - decisions for bot seats and disconnected humans.
//!
//! This module provides:
//! - `AiPlayer`: the policy seam the game flow calls
//! - `HokmBot`: the heuristic policy, in three styles
//! - `RandomPlayer`: uniform legal play, used as fallback
//! - a static registry of named factories

mod heuristic;
mod random;
pub mod registry;
mod trait_def;

#[cfg(test)]
mod tests_props_policy;

pub use heuristic::{HokmBot, PlayStyle};
pub use random::RandomPlayer;
pub use trait_def::{AiError, AiPlayer};

/// AI failure mode - how to handle policy errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiFailureMode {
    /// Surface the error (tests)
    Propagate,
    /// Fall back to a random legal move (production)
    FallbackRandom,
}

/// Create a policy by registered name.
///
/// Returns None if `name` is unrecognized.
pub fn create_ai(name: &str, seed: Option<u64>) -> Option<Box<dyn AiPlayer + Send + Sync>> {
    registry::by_name(name).map(|factory| (factory.make)(seed))
}
