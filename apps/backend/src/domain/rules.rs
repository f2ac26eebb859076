use serde::{Serialize, Serializer};

use crate::errors::domain::{DomainError, ValidationKind};

pub const PLAYERS: usize = 4;
pub const DECK_SIZE: usize = 52;
pub const HAND_SIZE: usize = 13;

/// Cards the hakem sees before choosing hokm.
pub const HAKEM_FIRST_DEAL: usize = 5;
/// Cards each other player receives right after hokm is chosen.
pub const OTHERS_FIRST_DEAL: usize = 5;
/// Batch size for the round-robin remainder of the deal.
pub const DEAL_BATCH: usize = 4;

pub const TRICKS_PER_ROUND: u8 = 13;
pub const TRICKS_TO_WIN_ROUND: u8 = 7;

/// Game length: the first team whose game score reaches this value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundsToWin {
    One,
    Three,
    #[default]
    Seven,
}

impl RoundsToWin {
    pub const fn value(self) -> u8 {
        match self {
            RoundsToWin::One => 1,
            RoundsToWin::Three => 3,
            RoundsToWin::Seven => 7,
        }
    }
}

impl TryFrom<u8> for RoundsToWin {
    type Error = DomainError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(RoundsToWin::One),
            3 => Ok(RoundsToWin::Three),
            7 => Ok(RoundsToWin::Seven),
            _ => Err(DomainError::validation(
                ValidationKind::InvalidRoundsToWin,
                format!("roundsToWin must be 1, 3 or 7 (got {n})"),
            )),
        }
    }
}

impl Serialize for RoundsToWin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.value())
    }
}
