// Error mapping across the three surfaces: domain, HTTP, realtime frames.
use std::collections::HashSet;

use crate::ai::AiError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::ws::protocol::ServerMsg;
use crate::{AppError, ErrorCode};

#[test]
fn gameplay_rejections_are_422() {
    for kind in [
        ValidationKind::WrongPhase,
        ValidationKind::NotYourTurn,
        ValidationKind::NotParticipant,
        ValidationKind::IllegalCard,
        ValidationKind::ParseCard,
        ValidationKind::PlayersNotReady,
        ValidationKind::InvalidRoundsToWin,
    ] {
        let app: AppError = DomainError::validation(kind, "nope").into();
        assert_eq!(app.status().as_u16(), 422, "{kind:?}");
    }
}

#[test]
fn unparseable_cards_read_as_illegal() {
    let err = "clubs-1".parse::<crate::domain::Card>().unwrap_err();
    let app: AppError = err.into();
    assert_eq!(app.code(), ErrorCode::IllegalCard);
}

#[test]
fn session_code_exhaustion_is_internal() {
    let app: AppError =
        DomainError::conflict(ConflictKind::SessionCodeConflict, "no free code").into();
    assert_eq!(app.code(), ErrorCode::InternalError);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn missing_seats_and_bots_are_not_participant() {
    for kind in [NotFoundKind::Player, NotFoundKind::Bot] {
        let app: AppError = DomainError::not_found(kind, "who?").into();
        assert_eq!(app.code(), ErrorCode::NotParticipant);
        assert_eq!(app.status().as_u16(), 404);
    }
}

#[test]
fn error_frames_carry_code_and_detail() {
    let app: AppError = DomainError::validation(ValidationKind::NotYourTurn, "Not your turn").into();
    let frame = serde_json::to_value(ServerMsg::from(&app)).unwrap();
    assert_eq!(
        frame,
        serde_json::json!({"type": "error", "code": "NOT_YOUR_TURN", "message": "Not your turn"})
    );
}

#[test]
fn ai_failures_never_name_a_gameplay_code() {
    let app: AppError = AiError::InvalidMove("empty hand".into()).into();
    assert_eq!(app.code(), ErrorCode::InternalError);
    assert!(app.detail().contains("empty hand"));
}

#[test]
fn wire_codes_are_unique() {
    let codes = [
        ErrorCode::WrongPhase,
        ErrorCode::NotYourTurn,
        ErrorCode::NotParticipant,
        ErrorCode::IllegalCard,
        ErrorCode::NotReady,
        ErrorCode::InvalidConfiguration,
        ErrorCode::SeatFull,
        ErrorCode::SessionNotFound,
        ErrorCode::AlreadyInSession,
        ErrorCode::BadRequest,
        ErrorCode::InternalError,
        ErrorCode::ConfigError,
    ];
    let unique: HashSet<&str> = codes.iter().map(ErrorCode::as_str).collect();
    assert_eq!(unique.len(), codes.len());
}
