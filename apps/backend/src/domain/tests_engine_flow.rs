//! Engine lifecycle: lobby, hakem determination, dealing, turn order.

use std::collections::HashSet;

use crate::domain::engine::{DecisionKind, RemovalOutcome, StartOutcome};
use crate::domain::rules::RoundsToWin;
use crate::domain::state::{next_seat, DealingStage, PhaseKind, Team};
use crate::domain::test_state_helpers::{dealt_table, full_table, play_first_legal, SEAT_IDS};
use crate::domain::{Card, HokmEngine, Rank, Suit};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

fn is_kind(err: &DomainError, kind: ValidationKind) -> bool {
    matches!(err, DomainError::Validation(k, _) if *k == kind)
}

#[test]
fn players_get_sequential_seats_and_parity_teams() {
    let engine = full_table(1);
    for (i, p) in engine.players().iter().enumerate() {
        assert_eq!(p.seat as usize, i);
        assert_eq!(p.team(), Team::of_seat(i as u8));
        assert!(p.is_connected);
        assert!(!p.is_bot);
    }
}

#[test]
fn fifth_player_is_rejected() {
    let mut engine = full_table(1);
    let err = engine.add_player("p4", "Late", None).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::SeatFull, _)));
    assert_eq!(engine.players().len(), 4);
}

#[test]
fn duplicate_player_is_rejected() {
    let mut engine = HokmEngine::with_seed("G", 1);
    engine.add_player("a", "A", None).unwrap();
    let err = engine.add_player("a", "A again", None).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyInSession, _)
    ));
}

#[test]
fn leaving_the_lobby_renumbers_seats() {
    let mut engine = full_table(1);
    assert_eq!(engine.remove_player("p1").unwrap(), RemovalOutcome::Removed);
    let ids: Vec<&str> = engine.players().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p0", "p2", "p3"]);
    let seats: Vec<u8> = engine.players().iter().map(|p| p.seat).collect();
    assert_eq!(seats, vec![0, 1, 2]);
    assert_eq!(engine.player("p2").unwrap().team(), Team::Team2);
}

#[test]
fn leaving_mid_game_keeps_the_seat() {
    let mut engine = dealt_table(2, Suit::Hearts);
    let hand_before = engine.player("p2").unwrap().hand.clone();
    assert_eq!(
        engine.remove_player("p2").unwrap(),
        RemovalOutcome::MarkedDisconnected
    );
    let p2 = engine.player("p2").unwrap();
    assert_eq!(p2.seat, 2);
    assert!(!p2.is_connected);
    assert_eq!(p2.hand, hand_before);
}

#[test]
fn removing_unknown_player_is_not_found() {
    let mut engine = full_table(1);
    let err = engine.remove_player("ghost").unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));
}

#[test]
fn bots_are_ready_and_named() {
    let mut engine = HokmEngine::with_seed("G", 5);
    engine.add_player("host", "Host", None).unwrap();
    let first = engine.add_bot().unwrap().clone();
    let second = engine.add_bot().unwrap().clone();
    assert!(first.is_bot && first.is_ready && first.is_connected);
    assert_eq!(first.name, "Bot 1");
    assert_eq!(second.name, "Bot 2");
    assert!(first.id.starts_with("bot_"));
    assert_eq!(first.id.len(), "bot_".len() + 8);
    assert_ne!(first.id, second.id);

    engine.remove_bot(&first.id).unwrap();
    assert_eq!(engine.players().len(), 2);
    assert_eq!(engine.player(&second.id).unwrap().seat, 1);
}

#[test]
fn remove_bot_refuses_humans() {
    let mut engine = HokmEngine::with_seed("G", 5);
    engine.add_player("host", "Host", None).unwrap();
    let err = engine.remove_bot("host").unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Bot, _)));
    assert_eq!(engine.players().len(), 1);
}

#[test]
fn rounds_to_win_only_in_lobby_and_only_1_3_7() {
    let mut engine = full_table(1);
    engine.set_rounds_to_win(3).unwrap();
    assert_eq!(engine.rounds_to_win(), RoundsToWin::Three);
    let err = engine.set_rounds_to_win(5).unwrap_err();
    assert!(is_kind(&err, ValidationKind::InvalidRoundsToWin));
    assert_eq!(engine.rounds_to_win(), RoundsToWin::Three);

    engine.start_game().unwrap();
    let err = engine.set_rounds_to_win(1).unwrap_err();
    assert!(is_kind(&err, ValidationKind::WrongPhase));
}

#[test]
fn start_requires_four_ready_players() {
    let mut engine = HokmEngine::with_seed("G", 1);
    for id in SEAT_IDS {
        engine.add_player(id, id, None).unwrap();
    }
    for id in &SEAT_IDS[..3] {
        engine.set_ready(id).unwrap();
    }
    let err = engine.start_game().unwrap_err();
    assert!(is_kind(&err, ValidationKind::PlayersNotReady));
    assert_eq!(engine.phase_kind(), PhaseKind::Waiting);

    engine.set_ready("p3").unwrap();
    assert!(engine.start_game().is_ok());
}

#[test]
fn scenario_start_draws_four_distinct_spades_lowest_is_hakem() {
    for seed in 0..20 {
        let mut engine = full_table(seed);
        let StartOutcome::HakemDetermined { hakem_id, draw } = engine.start_game().unwrap() else {
            panic!("first start must determine the hakem");
        };
        assert_eq!(engine.phase_kind(), PhaseKind::DeterminingHakem);
        assert_eq!(draw.len(), 4);
        let ranks: HashSet<Rank> = draw.iter().map(|d| d.card.rank).collect();
        assert_eq!(ranks.len(), 4);
        assert!(draw.iter().all(|d| d.card.suit == Suit::Spades));
        for (d, id) in draw.iter().zip(SEAT_IDS) {
            assert_eq!(d.player_id, id, "draw follows seat order");
        }
        let lowest = draw.iter().min_by_key(|d| d.card.rank.value()).unwrap();
        assert_eq!(hakem_id, lowest.player_id);
        assert_eq!(engine.hakem_id(), Some(hakem_id.as_str()));
        assert_eq!(engine.hakem_draw(), draw.as_slice());
    }
}

#[test]
fn scenario_hakem_sees_five_then_everyone_holds_thirteen() {
    let mut engine = full_table(9);
    engine.start_game().unwrap();
    engine.proceed_to_dealing().unwrap();
    assert_eq!(engine.phase_kind(), PhaseKind::ChoosingHokm);
    assert_eq!(engine.dealing_stage(), Some(DealingStage::HakemFirst5));

    let hakem = engine.hakem_id().unwrap().to_string();
    assert_eq!(engine.current_player_id(), Some(hakem.as_str()));
    for p in engine.players() {
        let expected = if p.id == hakem { 5 } else { 0 };
        assert_eq!(p.hand.len(), expected);
    }
    let first_five = engine.player(&hakem).unwrap().hand.clone();

    engine.select_hokm(&hakem, Suit::Diamonds).unwrap();
    assert_eq!(engine.phase_kind(), PhaseKind::Playing);
    assert_eq!(engine.dealing_stage(), Some(DealingStage::Complete));
    assert_eq!(engine.hokm(), Some(Suit::Diamonds));
    assert_eq!(engine.current_player_id(), Some(hakem.as_str()));
    for p in engine.players() {
        assert_eq!(p.hand.len(), 13);
    }
    let hakem_hand = &engine.player(&hakem).unwrap().hand;
    assert!(first_five.iter().all(|c| hakem_hand.contains(c)));
    // The stock is exhausted: hands hold the whole deck.
    let ledger: HashSet<Card> = engine.card_ledger().into_iter().collect();
    assert_eq!(ledger.len(), 52);
    assert_eq!(engine.card_ledger().len(), 52);
}

#[test]
fn only_the_hakem_may_choose_hokm() {
    let mut engine = full_table(4);
    engine.start_game().unwrap();
    engine.proceed_to_dealing().unwrap();
    let hakem = engine.hakem_id().unwrap().to_string();
    let other = SEAT_IDS.iter().find(|id| **id != hakem).unwrap();
    let err = engine.select_hokm(other, Suit::Clubs).unwrap_err();
    assert!(is_kind(&err, ValidationKind::NotParticipant));
    assert_eq!(engine.phase_kind(), PhaseKind::ChoosingHokm);
    assert_eq!(engine.hokm(), None);
}

#[test]
fn proceed_to_dealing_is_phase_guarded() {
    let mut engine = full_table(4);
    let err = engine.proceed_to_dealing().unwrap_err();
    assert!(is_kind(&err, ValidationKind::WrongPhase));
    engine.start_game().unwrap();
    engine.proceed_to_dealing().unwrap();
    let err = engine.proceed_to_dealing().unwrap_err();
    assert!(is_kind(&err, ValidationKind::WrongPhase));
}

#[test]
fn turns_run_counter_clockwise() {
    let mut engine = dealt_table(21, Suit::Spades);
    let seat_of = |e: &HokmEngine, id: &str| e.player(id).unwrap().seat;
    for _ in 0..3 {
        let before = engine.current_player_id().unwrap().to_string();
        let out = play_first_legal(&mut engine);
        assert!(out.trick.is_none());
        let after = engine.current_player_id().unwrap().to_string();
        assert_eq!(
            seat_of(&engine, &after),
            next_seat(seat_of(&engine, &before))
        );
    }
    // Fourth card resolves the trick; the winner leads next.
    let out = play_first_legal(&mut engine);
    let trick = out.trick.expect("trick complete");
    assert_eq!(engine.current_player_id(), Some(trick.winner_id.as_str()));
    assert_eq!(engine.trick_number(), 2);
    assert_eq!(engine.round_score().get(trick.winner_team), 1);
}

#[test]
fn out_of_turn_play_is_rejected_without_change() {
    let mut engine = dealt_table(8, Suit::Clubs);
    let current = engine.current_player_id().unwrap().to_string();
    let other = SEAT_IDS.iter().find(|id| **id != current).unwrap();
    let card = engine.player(other).unwrap().hand[0];
    let views_before: Vec<_> = SEAT_IDS.iter().map(|id| engine.view_for(id)).collect();

    let err = engine.play_card(other, card).unwrap_err();
    assert!(is_kind(&err, ValidationKind::NotYourTurn));
    let views_after: Vec<_> = SEAT_IDS.iter().map(|id| engine.view_for(id)).collect();
    assert_eq!(views_before, views_after);
}

#[test]
fn card_not_in_hand_is_rejected() {
    let mut engine = dealt_table(8, Suit::Clubs);
    let current = engine.current_player_id().unwrap().to_string();
    let other = SEAT_IDS.iter().find(|id| **id != current).unwrap();
    let foreign = engine.player(other).unwrap().hand[0];
    let err = engine.play_card(&current, foreign).unwrap_err();
    assert!(is_kind(&err, ValidationKind::IllegalCard));
    assert_eq!(engine.player(&current).unwrap().hand.len(), 13);
}

#[test]
fn play_before_hokm_is_wrong_phase() {
    let mut engine = full_table(3);
    engine.start_game().unwrap();
    engine.proceed_to_dealing().unwrap();
    let hakem = engine.hakem_id().unwrap().to_string();
    let card = engine.player(&hakem).unwrap().hand[0];
    let err = engine.play_card(&hakem, card).unwrap_err();
    assert!(is_kind(&err, ValidationKind::WrongPhase));
}

#[test]
fn disconnected_current_player_owes_an_automated_decision() {
    let mut engine = dealt_table(13, Suit::Hearts);
    assert!(engine.pending_automated_decision().is_none());
    let current = engine.current_player_id().unwrap().to_string();
    engine.remove_player(&current).unwrap();

    let pending = engine.pending_automated_decision().expect("autoplay owed");
    assert_eq!(pending.player_id, current);
    assert_eq!(pending.kind, DecisionKind::PlayCard);

    engine.replace_with_bot(&current).unwrap();
    let p = engine.player(&current).unwrap();
    assert!(p.is_bot && p.is_connected);
    assert!(p.name.starts_with("Bot ("));
    assert!(engine.pending_automated_decision().is_some());

    // Replacing twice does not rename twice.
    let name = p.name.clone();
    engine.replace_with_bot(&current).unwrap();
    assert_eq!(engine.player(&current).unwrap().name, name);
}

#[test]
fn automated_hakem_owes_hokm_choice() {
    let mut engine = full_table(6);
    engine.start_game().unwrap();
    engine.proceed_to_dealing().unwrap();
    let hakem = engine.hakem_id().unwrap().to_string();
    engine.remove_player(&hakem).unwrap();
    let pending = engine.pending_automated_decision().unwrap();
    assert_eq!(pending.kind, DecisionKind::ChooseHokm);
    assert_eq!(pending.player_id, hakem);
}

#[test]
fn replace_with_bot_not_allowed_in_lobby() {
    let mut engine = full_table(6);
    let err = engine.replace_with_bot("p0").unwrap_err();
    assert!(is_kind(&err, ValidationKind::WrongPhase));
}

#[test]
fn full_round_reaches_round_end_or_game_end() {
    let mut engine = dealt_table(77, Suit::Hearts);
    let mut plays = 0;
    while engine.phase_kind() == PhaseKind::Playing {
        play_first_legal(&mut engine);
        plays += 1;
        assert!(plays <= 52);
    }
    assert_eq!(engine.phase_kind(), PhaseKind::RoundEnd);
    let score = engine.round_score();
    assert!(score.team1 == 7 || score.team2 == 7);
    assert!(engine.current_player_id().is_none());
    let last = engine.last_round().unwrap();
    assert_eq!(engine.game_score().get(last.winning_team), last.points);
}

#[test]
fn next_round_deals_again_with_phase_guard() {
    let mut engine = dealt_table(77, Suit::Hearts);
    let err = engine.start_next_round().unwrap_err();
    assert!(is_kind(&err, ValidationKind::WrongPhase));
    while engine.phase_kind() == PhaseKind::Playing {
        play_first_legal(&mut engine);
    }
    engine.start_next_round().unwrap();
    assert_eq!(engine.phase_kind(), PhaseKind::ChoosingHokm);
    assert_eq!(engine.round_number(), 2);
    assert_eq!(engine.round_score().team1 + engine.round_score().team2, 0);
    assert_eq!(engine.hokm(), None);
    assert!(engine.hakem_draw().is_empty());
    assert!(engine.last_round().is_none());
    let hakem = engine.hakem_id().unwrap();
    assert_eq!(engine.player(hakem).unwrap().hand.len(), 5);
    assert_eq!(engine.card_ledger().len(), 52);
}
