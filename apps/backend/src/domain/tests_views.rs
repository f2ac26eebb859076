//! Redaction: a view never leaks another seat's cards.

use crate::domain::state::PhaseKind;
use crate::domain::test_state_helpers::{dealt_table, full_table, play_first_legal, SEAT_IDS};
use crate::domain::Suit;

#[test]
fn hakem_cards_only_reach_the_hakem() {
    let mut engine = full_table(31);
    engine.start_game().unwrap();
    engine.proceed_to_dealing().unwrap();
    let hakem = engine.hakem_id().unwrap().to_string();
    let hakem_hand = engine.player(&hakem).unwrap().hand.clone();

    for id in SEAT_IDS {
        let view = engine.view_for(id);
        assert_eq!(view.phase, PhaseKind::ChoosingHokm);
        if id == hakem {
            assert_eq!(view.hakem_cards, hakem_hand);
            assert_eq!(view.player(id).unwrap().hand, hakem_hand);
        } else {
            assert!(view.hakem_cards.is_empty());
            let json = serde_json::to_string(&view).unwrap();
            for card in &hakem_hand {
                assert!(
                    !json.contains(&card.id()),
                    "{id} must not see {}",
                    card.id()
                );
            }
        }
        assert_eq!(view.player(&hakem).unwrap().card_count, 5);
    }
}

#[test]
fn views_show_only_the_viewers_hand() {
    let mut engine = dealt_table(32, Suit::Hearts);
    // A couple of plays so the trick is partly filled.
    play_first_legal(&mut engine);
    play_first_legal(&mut engine);

    for viewer in SEAT_IDS {
        let view = engine.view_for(viewer);
        assert!(view.hakem_cards.is_empty(), "hakem cards end with hokm");
        for p in &view.players {
            let real = engine.player(&p.id).unwrap();
            assert_eq!(p.card_count, real.hand.len());
            if p.id == viewer {
                assert_eq!(p.hand, real.hand);
            } else {
                assert!(p.hand.is_empty());
            }
        }
        // Played cards are public.
        assert_eq!(view.current_trick.plays.len(), 2);
    }
}

#[test]
fn unknown_viewer_sees_no_hands() {
    let engine = dealt_table(33, Suit::Clubs);
    let view = engine.view_for("stranger");
    assert!(view.players.iter().all(|p| p.hand.is_empty()));
    assert!(view.hakem_cards.is_empty());
}

#[test]
fn view_serializes_in_camel_case() {
    let engine = dealt_table(34, Suit::Diamonds);
    let json = serde_json::to_value(engine.view_for("p0")).unwrap();
    assert_eq!(json["phase"], "playing");
    assert_eq!(json["hokm"], "diamonds");
    assert_eq!(json["roundsToWin"], 7);
    assert!(json["currentPlayerId"].is_string());
    assert!(json["gameScore"]["team1"].is_number());
    assert_eq!(json["players"][0]["cardCount"], 13);
    assert_eq!(json["players"][1]["team"], "team2");
}
