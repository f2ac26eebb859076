//! Realtime wire messages.
//!
//! Every frame is a JSON object tagged by `"type"`; variant and field names
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::engine::HakemDraw;
use crate::domain::player_view::{GameView, PlayerView};
use crate::domain::scoring::RoundResult;
use crate::domain::state::{PlayerId, Team, TeamScore};
use crate::domain::{Card, Suit};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Client intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMsg {
    Create {
        player_name: String,
        #[serde(default)]
        external_id: Option<String>,
    },
    Join {
        session_id: String,
        player_name: String,
        #[serde(default)]
        external_id: Option<String>,
    },
    Leave,
    Ready,
    SetRoundsToWin {
        value: u8,
    },
    StartGame,
    AddBot,
    RemoveBot {
        bot_id: PlayerId,
    },
    SelectHokm {
        suit: Suit,
    },
    PlayCard {
        card_id: String,
    },
}

impl ClientMsg {
    /// Short name for logs.
    pub fn action(&self) -> &'static str {
        match self {
            ClientMsg::Create { .. } => "create",
            ClientMsg::Join { .. } => "join",
            ClientMsg::Leave => "leave",
            ClientMsg::Ready => "ready",
            ClientMsg::SetRoundsToWin { .. } => "setRoundsToWin",
            ClientMsg::StartGame => "startGame",
            ClientMsg::AddBot => "addBot",
            ClientMsg::RemoveBot { .. } => "removeBot",
            ClientMsg::SelectHokm { .. } => "selectHokm",
            ClientMsg::PlayCard { .. } => "playCard",
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMsg {
    /// First frame on every connection.
    Welcome { player_id: PlayerId },
    /// Redacted session view for the recipient.
    State { state: GameView },
    Hand { cards: Vec<Card> },
    /// The hakem's first five cards; only ever sent to the hakem.
    HakemCards { cards: Vec<Card> },
    HakemDetermined {
        hakem_id: PlayerId,
        cards: Vec<HakemDraw>,
    },
    PlayerJoined { player: PlayerView },
    PlayerLeft { player_id: PlayerId },
    CardPlayed { player_id: PlayerId, card: Card },
    TrickWon { player_id: PlayerId, team: Team },
    RoundEnd {
        round_score: TeamScore,
        game_score: TeamScore,
        result: RoundResult,
        points: u8,
    },
    GameEnd {
        winning_team: Team,
        final_score: TeamScore,
    },
    HokmSelected { suit: Suit },
    YourTurn,
    Error { code: ErrorCode, message: String },
}

impl ServerMsg {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code,
            message: message.into(),
        }
    }
}

impl From<&AppError> for ServerMsg {
    fn from(err: &AppError) -> Self {
        ServerMsg::error(err.code(), err.detail())
    }
}
