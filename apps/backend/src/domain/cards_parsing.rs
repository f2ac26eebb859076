//! Card parsing from wire identities (e.g. "hearts-10", "spades-A")

use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((suit, rank)) = s.split_once('-') else {
            return Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Parse card: {s}"),
            ));
        };
        let suit = Suit::from_str(suit)?;
        let rank = Rank::from_str(rank)?;
        Ok(Card { suit, rank })
    }
}
