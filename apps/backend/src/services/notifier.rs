//! Outbound notices for sessions tagged with an external notification
//! target (a chat group, for instance). Delivery belongs to whatever
//! implements [`GameNotifier`]; the default only logs.

use serde::Serialize;
use tracing::info;

use crate::domain::scoring::RoundResult;
use crate::domain::state::{Team, TeamScore};

/// Events worth telling the outside world about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum NotableEvent {
    PlayerJoined {
        player_name: String,
        external_id: Option<String>,
        player_count: usize,
        players: Vec<String>,
    },
    GameStarted {
        hakem_name: String,
        players: Vec<String>,
    },
    RoundEnded {
        winning_team: Team,
        result: RoundResult,
        points: u8,
        game_score: TeamScore,
    },
    GameEnded {
        winning_team: Team,
        game_score: TeamScore,
    },
}

impl NotableEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NotableEvent::PlayerJoined { .. } => "player_joined",
            NotableEvent::GameStarted { .. } => "game_started",
            NotableEvent::RoundEnded { .. } => "round_ended",
            NotableEvent::GameEnded { .. } => "game_ended",
        }
    }
}

pub trait GameNotifier: Send + Sync {
    fn notify(&self, session_id: &str, target: i64, event: &NotableEvent);
}

/// Writes each notice to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl GameNotifier for LogNotifier {
    fn notify(&self, session_id: &str, target: i64, event: &NotableEvent) {
        info!(
            session_id,
            target,
            event = event.name(),
            payload = %serde_json::to_string(event).unwrap_or_default(),
            "notable event"
        );
    }
}
