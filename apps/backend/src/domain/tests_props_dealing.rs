use std::collections::HashSet;

use proptest::prelude::*;

use crate::domain::state::PhaseKind;
use crate::domain::test_state_helpers::{dealt_table, play_first_legal};
use crate::domain::{test_gens, test_prelude, Card};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: after dealing, hands + played cards + stock is the full deck
    /// exactly once, at every point of the round.
    #[test]
    fn prop_cards_are_conserved(
        seed in any::<u64>(),
        hokm in test_gens::suit(),
        plays in 0usize..52,
    ) {
        let mut engine = dealt_table(seed, hokm);
        for _ in 0..plays {
            if engine.phase_kind() != PhaseKind::Playing {
                break;
            }
            play_first_legal(&mut engine);
            let ledger = engine.card_ledger();
            let unique: HashSet<Card> = ledger.iter().copied().collect();
            prop_assert_eq!(ledger.len(), 52);
            prop_assert_eq!(unique.len(), 52);
        }
    }

    /// Property: every dealt hand is sorted spades, hearts, diamonds, clubs
    /// with descending rank inside a suit.
    #[test]
    fn prop_dealt_hands_are_sorted(seed in any::<u64>(), hokm in test_gens::suit()) {
        let engine = dealt_table(seed, hokm);
        for p in engine.players() {
            let keys: Vec<(u8, std::cmp::Reverse<crate::domain::Rank>)> = p
                .hand
                .iter()
                .map(|c| (c.suit.display_precedence(), std::cmp::Reverse(c.rank)))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }
    }
}
