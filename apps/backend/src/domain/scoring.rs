//! Round classification and game points.

use serde::Serialize;

use crate::domain::state::{Team, TeamScore};

/// How a round was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundResult {
    /// The losing side took at least one trick.
    Normal,
    /// The hakem's team shut the opponents out.
    Kut,
    /// The opponents shut the hakem's team out.
    HakemKut,
}

impl RoundResult {
    pub const fn points(self) -> u8 {
        match self {
            RoundResult::Normal => 1,
            RoundResult::Kut => 2,
            RoundResult::HakemKut => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub winning_team: Team,
    pub result: RoundResult,
    pub points: u8,
    pub tricks: TeamScore,
}

/// Classify a finished round. The winner is the team with more tricks; the
/// tier depends on whether the loser took none and on which side the hakem sat.
pub fn classify_round(tricks: TeamScore, hakem_team: Team) -> RoundOutcome {
    let winning_team = tricks.leader().unwrap_or(hakem_team.other());
    let losing_tricks = tricks.get(winning_team.other());
    let result = if losing_tricks > 0 {
        RoundResult::Normal
    } else if winning_team == hakem_team {
        RoundResult::Kut
    } else {
        RoundResult::HakemKut
    };
    RoundOutcome {
        winning_team,
        result,
        points: result.points(),
        tricks,
    }
}
