use proptest::prelude::*;

use crate::ai::{AiPlayer, HokmBot, PlayStyle};
use crate::domain::engine::{DecisionKind, HokmEngine};
use crate::domain::state::PhaseKind;
use crate::domain::test_state_helpers::full_table;
use crate::domain::{test_gens, test_prelude, Card, Rank, SeatAction, Suit};

fn style() -> impl Strategy<Value = PlayStyle> {
    prop_oneof![
        Just(PlayStyle::Balanced),
        Just(PlayStyle::Aggressive),
        Just(PlayStyle::Defensive),
    ]
}

/// Let the policy decide for whoever acts next until the round is over.
fn autoplay_round(engine: &mut HokmEngine, bot: &HokmBot) -> Result<(), TestCaseError> {
    for _ in 0..60 {
        let phase = engine.phase_kind();
        let actor = match phase {
            PhaseKind::ChoosingHokm => engine.hakem_id(),
            PhaseKind::Playing => engine.current_player_id(),
            _ => return Ok(()),
        };
        let actor = actor.map(str::to_owned).ok_or_else(|| {
            TestCaseError::fail(format!("nobody to act in {phase}"))
        })?;
        let view = engine.view_for(&actor);
        let hand = view
            .player(&actor)
            .map(|p| p.hand.clone())
            .unwrap_or_default();
        let action = if phase == PhaseKind::ChoosingHokm {
            prop_assert_eq!(hand.len(), 5);
            SeatAction::SelectHokm(bot.choose_trump(&hand).map_err(|e| {
                TestCaseError::fail(e.to_string())
            })?)
        } else {
            let card = bot
                .choose_play(&hand, &view, &actor)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert!(view.legal_plays(&hand).contains(&card));
            SeatAction::PlayCard(card)
        };
        engine
            .apply_seat_action(&actor, action)
            .map_err(|e| TestCaseError::fail(format!("engine rejected {action:?}: {e}")))?;
    }
    Err(TestCaseError::fail("round did not finish"))
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: the policy only ever produces moves the engine accepts, and a
    /// round driven entirely by it reaches roundEnd or gameEnd.
    #[test]
    fn prop_policy_plays_whole_rounds(seed in any::<u64>(), style in style()) {
        let bot = HokmBot::new(style);
        let mut engine = full_table(seed);
        engine.start_game().map_err(|e| TestCaseError::fail(e.to_string()))?;
        engine.proceed_to_dealing().map_err(|e| TestCaseError::fail(e.to_string()))?;
        autoplay_round(&mut engine, &bot)?;
        prop_assert!(matches!(
            engine.phase_kind(),
            PhaseKind::RoundEnd | PhaseKind::GameEnd
        ));
    }

    /// Property: with a single legal card the policy returns exactly that card.
    #[test]
    fn prop_forced_card_is_played((hand, lead) in test_gens::hand_and_lead(), style in style()) {
        let mut engine = full_table(0);
        engine.start_game().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assume!(lead.is_some());
        let lead = lead.unwrap_or(Suit::Hearts);
        let mut view = engine.view_for("p0");
        view.hokm = Some(Suit::Spades);
        let lead_card = Card::new(lead, Rank::Two);
        view.current_trick.push("p3".into(), lead_card);
        let legal = view.legal_plays(&hand);
        prop_assume!(legal.len() == 1);
        let bot = HokmBot::new(style);
        prop_assert_eq!(bot.choose_play(&hand, &view, "p0").ok(), Some(legal[0]));
    }
}

#[test]
fn pending_decision_kinds_match_phase() {
    let mut engine = full_table(7);
    engine.start_game().unwrap();
    engine.proceed_to_dealing().unwrap();
    assert_eq!(engine.pending_automated_decision(), None, "humans are connected");

    let hakem = engine.hakem_id().unwrap().to_string();
    engine.replace_with_bot(&hakem).unwrap();
    let pending = engine.pending_automated_decision().unwrap();
    assert_eq!(pending.player_id, hakem);
    assert_eq!(pending.kind, DecisionKind::ChooseHokm);
}
