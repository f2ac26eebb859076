//! Domain layer: pure game logic types and helpers.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod engine;
pub mod player_view;
pub mod rules;
pub mod scoring;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod tests_engine_flow;
#[cfg(test)]
mod tests_props_dealing;
#[cfg(test)]
mod tests_props_trick_winner;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_views;

// Re-exports for ergonomics
pub use cards_logic::{card_value, hand_has_suit, legal_plays};
pub use cards_types::{Card, Rank, Suit};
pub use engine::{HokmEngine, PlayOutcome, SeatAction, SeatOutcome};
pub use player_view::GameView;
pub use state::{Phase, PhaseKind, PlayerId, Seat, Team};
