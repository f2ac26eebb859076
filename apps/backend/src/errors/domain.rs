//! Domain-level error type used by the engine, the registry and the flow service.
//!
//! This error type is transport-agnostic. HTTP handlers convert it into
//! `crate::error::AppError`; the realtime layer turns it into a directed
//! `error` frame via [`DomainError::code`].

use thiserror::Error;

use super::error_code::ErrorCode;

/// Validation failures: the request is well-formed but not allowed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    WrongPhase,
    NotYourTurn,
    NotParticipant,
    IllegalCard,
    ParseCard,
    PlayersNotReady,
    InvalidRoundsToWin,
    BadRequest,
    /// Internal bookkeeping no longer adds up; never caused by client input.
    InvariantViolated,
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    SeatFull,
    AlreadyInSession,
    SessionCodeConflict,
}

/// Domain-level not found entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Player,
    Bot,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input validation or rule violation
    #[error("validation error: {1}")]
    Validation(ValidationKind, String),
    /// Semantic conflict
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn wrong_phase(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::WrongPhase, detail)
    }

    /// Human-readable detail without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d) => d,
        }
    }

    /// Wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::WrongPhase => ErrorCode::WrongPhase,
                ValidationKind::NotYourTurn => ErrorCode::NotYourTurn,
                ValidationKind::NotParticipant => ErrorCode::NotParticipant,
                ValidationKind::IllegalCard | ValidationKind::ParseCard => ErrorCode::IllegalCard,
                ValidationKind::PlayersNotReady => ErrorCode::NotReady,
                ValidationKind::InvalidRoundsToWin => ErrorCode::InvalidConfiguration,
                ValidationKind::BadRequest => ErrorCode::BadRequest,
                ValidationKind::InvariantViolated => ErrorCode::InternalError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::SeatFull => ErrorCode::SeatFull,
                ConflictKind::AlreadyInSession => ErrorCode::AlreadyInSession,
                ConflictKind::SessionCodeConflict => ErrorCode::InternalError,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Session => ErrorCode::SessionNotFound,
                NotFoundKind::Player | NotFoundKind::Bot => ErrorCode::NotParticipant,
            },
        }
    }
}
