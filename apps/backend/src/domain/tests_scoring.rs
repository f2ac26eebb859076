//! Rigged rounds: early round end, shutout tiers, hakem succession, game end.

use crate::domain::scoring::RoundResult;
use crate::domain::state::{PhaseKind, Team};
use crate::domain::test_state_helpers::{play_first_legal, rigged_table, suit_run};
use crate::domain::Suit;
use crate::errors::domain::{DomainError, ValidationKind};

/// Seat 0 holds every spade (hokm); the others hold one full suit each.
fn spade_wall() -> [Vec<crate::domain::Card>; 4] {
    [
        suit_run(Suit::Spades),
        suit_run(Suit::Hearts),
        suit_run(Suit::Diamonds),
        suit_run(Suit::Clubs),
    ]
}

#[test]
fn round_ends_at_seventh_trick_with_hakem_shutout_bonus() {
    let mut engine = rigged_table(spade_wall(), 0, Suit::Spades);

    for trick in 1..=7 {
        assert_eq!(engine.phase_kind(), PhaseKind::Playing, "trick {trick}");
        let mut completed = None;
        for _ in 0..4 {
            completed = play_first_legal(&mut engine).trick;
        }
        let completed = completed.expect("fourth card resolves the trick");
        assert_eq!(completed.winner_id, "p0");
        assert_eq!(completed.winner_team, Team::Team1);
    }

    // Seven tricks, not thirteen.
    assert_eq!(engine.phase_kind(), PhaseKind::RoundEnd);
    assert_eq!(engine.round_score().team1, 7);
    assert_eq!(engine.round_score().team2, 0);
    assert_eq!(engine.player("p0").unwrap().hand.len(), 6);

    let last = engine.last_round().unwrap();
    assert_eq!(last.result, RoundResult::Kut);
    assert_eq!(last.points, 2);
    assert_eq!(engine.game_score().team1, 2);
    assert_eq!(engine.game_score().team2, 0);
}

#[test]
fn shutting_out_the_hakem_scores_three_and_moves_the_hakem() {
    // Hakem sits at seat 1 (team 2) and leads hearts; seat 0 trumps in and
    // then leads spades for the rest of the round.
    let mut engine = rigged_table(spade_wall(), 1, Suit::Spades);
    let mut plays = 0;
    while engine.phase_kind() == PhaseKind::Playing {
        play_first_legal(&mut engine);
        plays += 1;
    }
    assert_eq!(plays, 28);
    assert_eq!(engine.round_score().team1, 7);
    let last = engine.last_round().unwrap();
    assert_eq!(last.winning_team, Team::Team1);
    assert_eq!(last.result, RoundResult::HakemKut);
    assert_eq!(last.points, 3);
    assert_eq!(engine.game_score().team1, 3);

    // The hakem's team lost: the role moves counter-clockwise from seat 1.
    engine.start_next_round().unwrap();
    assert_eq!(engine.hakem_id(), Some("p0"));
    assert_eq!(engine.current_player_id(), Some("p0"));
}

#[test]
fn winning_hakem_keeps_the_role() {
    let mut engine = rigged_table(spade_wall(), 0, Suit::Spades);
    while engine.phase_kind() == PhaseKind::Playing {
        play_first_legal(&mut engine);
    }
    engine.start_next_round().unwrap();
    assert_eq!(engine.hakem_id(), Some("p0"));
    assert_eq!(engine.round_number(), 2);
}

#[test]
fn game_ends_when_score_reaches_rounds_to_win() {
    let mut engine = crate::domain::test_state_helpers::full_table(0);
    engine.set_rounds_to_win(1).unwrap();
    engine.rig_round(spade_wall(), 0, Suit::Spades);
    let mut last_outcome = None;
    while engine.phase_kind() == PhaseKind::Playing {
        last_outcome = Some(play_first_legal(&mut engine));
    }
    assert_eq!(engine.phase_kind(), PhaseKind::GameEnd);
    assert_eq!(engine.winning_team(), Some(Team::Team1));
    let outcome = last_outcome.unwrap();
    assert_eq!(outcome.game_winner, Some(Team::Team1));
    assert!(outcome.round.is_some());

    let err = engine.start_next_round().unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::WrongPhase, _)
    ));
}

#[test]
fn contested_round_scores_one_point() {
    // The hakem (seat 1) wins the first trick with the ace of spades; seat 0
    // then takes the second with the lone ace of hearts, so neither side is
    // shut out.
    use crate::domain::{Card, Rank};
    let spades = suit_run(Suit::Spades);
    let hearts = suit_run(Suit::Hearts);
    let mut seat0: Vec<Card> = spades[1..].to_vec();
    seat0.push(hearts[0]);
    let mut seat1: Vec<Card> = vec![spades[0]];
    seat1.extend(hearts[1..].iter().copied());
    assert_eq!(seat1[0], Card::new(Suit::Spades, Rank::Ace));

    let mut engine = rigged_table(
        [seat0, seat1, suit_run(Suit::Diamonds), suit_run(Suit::Clubs)],
        1,
        Suit::Spades,
    );
    let first = (0..4).filter_map(|_| play_first_legal(&mut engine).trick).last();
    assert_eq!(first.unwrap().winner_id, "p1");
    let second = (0..4).filter_map(|_| play_first_legal(&mut engine).trick).last();
    assert_eq!(second.unwrap().winner_id, "p0");

    while engine.phase_kind() == PhaseKind::Playing {
        play_first_legal(&mut engine);
    }
    let last = engine.last_round().unwrap();
    let loser = last.winning_team.other();
    assert!(engine.round_score().get(loser) > 0);
    assert_eq!(last.result, RoundResult::Normal);
    assert_eq!(last.points, 1);
}
