use proptest::prelude::*;

use crate::domain::tricks::{winning_index, TrickPlay};
use crate::domain::{card_value, test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: exactly one play wins, and its value is strictly greater
    /// than each of the other three.
    #[test]
    fn prop_winner_strictly_dominates((cards, hokm) in test_gens::complete_trick()) {
        let plays: Vec<TrickPlay> = cards
            .iter()
            .enumerate()
            .map(|(i, &card)| TrickPlay { player_id: format!("p{i}"), card })
            .collect();
        let lead = cards[0].suit;

        let winner = winning_index(&plays, lead, hokm).expect("four plays have a winner");
        let best = card_value(plays[winner].card, lead, hokm);
        for (i, p) in plays.iter().enumerate() {
            if i != winner {
                prop_assert!(best > card_value(p.card, lead, hokm),
                    "winner {:?} must beat {:?} (lead {:?}, hokm {:?})",
                    plays[winner].card, p.card, lead, hokm);
            }
        }
    }

    /// Property: if any trump was played the winner is a trump; otherwise it
    /// is of the lead suit.
    #[test]
    fn prop_winner_suit((cards, hokm) in test_gens::complete_trick()) {
        let plays: Vec<TrickPlay> = cards
            .iter()
            .map(|&card| TrickPlay { player_id: String::new(), card })
            .collect();
        let lead = cards[0].suit;
        let winner = plays[winning_index(&plays, lead, hokm).unwrap()].card;
        if cards.iter().any(|c| c.suit == hokm) {
            prop_assert_eq!(winner.suit, hokm);
        } else {
            prop_assert_eq!(winner.suit, lead);
        }
    }
}
