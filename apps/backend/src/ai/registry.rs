//! How to register a policy
//!
//! 1) Implement `AiPlayer` for your type in its module.
//! 2) Add a new `AiFactory` entry to the static list with a stable `name`.
//! 3) Keep ordering stable; avoid side effects in constructors.

use crate::ai::{AiPlayer, HokmBot, PlayStyle, RandomPlayer};

/// Factory definition for constructing AI implementations.
pub struct AiFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Box<dyn AiPlayer + Send + Sync>,
}

static AI_FACTORIES: &[AiFactory] = &[
    AiFactory {
        name: "balanced",
        version: HokmBot::VERSION,
        make: make_balanced,
    },
    AiFactory {
        name: "aggressive",
        version: HokmBot::VERSION,
        make: make_aggressive,
    },
    AiFactory {
        name: "defensive",
        version: HokmBot::VERSION,
        make: make_defensive,
    },
    AiFactory {
        name: "random",
        version: RandomPlayer::VERSION,
        make: make_random_player,
    },
];

/// Returns the statically registered AI factories.
pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

/// Finds a registered AI factory by its name.
pub fn by_name(name: &str) -> Option<&'static AiFactory> {
    registered_ais().iter().find(|factory| factory.name == name)
}

fn make_balanced(_seed: Option<u64>) -> Box<dyn AiPlayer + Send + Sync> {
    Box::new(HokmBot::new(PlayStyle::Balanced))
}

fn make_aggressive(_seed: Option<u64>) -> Box<dyn AiPlayer + Send + Sync> {
    Box::new(HokmBot::new(PlayStyle::Aggressive))
}

fn make_defensive(_seed: Option<u64>) -> Box<dyn AiPlayer + Send + Sync> {
    Box::new(HokmBot::new(PlayStyle::Defensive))
}

fn make_random_player(seed: Option<u64>) -> Box<dyn AiPlayer + Send + Sync> {
    Box::new(RandomPlayer::new(seed))
}
