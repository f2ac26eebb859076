//! Error codes for the Hokm backend.
//!
//! Every code that leaves the process, whether in an HTTP Problem Details body
//! or a realtime `error` frame, is defined here. Never pass ad-hoc strings.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear on the wire.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes for the Hokm backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Gameplay
    /// Operation is not valid in the session's current phase
    WrongPhase,
    /// Caller is not the player whose turn it is
    NotYourTurn,
    /// Caller is not seated, or lacks the creator/hakem privilege
    NotParticipant,
    /// Card not held, or follow-suit violation
    IllegalCard,
    /// Not every seated player has marked ready
    NotReady,
    /// Rounds-to-win value outside {1, 3, 7}
    InvalidConfiguration,

    // Sessions
    /// Session already has four players
    SeatFull,
    /// Unknown session id
    SessionNotFound,
    /// Connection is already seated in a session
    AlreadyInSession,

    // Requests
    /// Malformed or unparseable request
    BadRequest,

    // System
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WrongPhase => "WRONG_PHASE",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::IllegalCard => "ILLEGAL_CARD",
            Self::NotReady => "NOT_READY",
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",

            Self::SeatFull => "SEAT_FULL",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::AlreadyInSession => "ALREADY_IN_SESSION",

            Self::BadRequest => "BAD_REQUEST",

            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
