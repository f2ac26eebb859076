//! Card game logic: suit checks, follow-suit legality, trick strength, hand order

use std::cmp::Reverse;

use super::cards_types::{Card, Suit};

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Strength of `card` inside a trick: trumps score 100 + rank, lead-suit cards
/// score their rank, everything else scores 0 and can never win.
pub fn card_value(card: Card, lead: Suit, hokm: Suit) -> u8 {
    if card.suit == hokm {
        100 + card.value()
    } else if card.suit == lead {
        card.value()
    } else {
        0
    }
}

/// Whether `card` may be played from `hand` given the current lead suit.
///
/// With no lead (first card of a trick) anything held is legal; otherwise the
/// card must follow the lead unless the hand has no card of that suit.
pub fn is_legal_play(hand: &[Card], card: Card, lead: Option<Suit>) -> bool {
    if !hand.contains(&card) {
        return false;
    }
    match lead {
        Some(lead) if hand_has_suit(hand, lead) => card.suit == lead,
        _ => true,
    }
}

/// The legal subset of `hand`, in hand order.
pub fn legal_plays(hand: &[Card], lead: Option<Suit>) -> Vec<Card> {
    match lead {
        Some(lead) if hand_has_suit(hand, lead) => {
            hand.iter().copied().filter(|c| c.suit == lead).collect()
        }
        _ => hand.to_vec(),
    }
}

/// Sort a hand for display: grouped by suit (spades, hearts, diamonds, clubs),
/// descending rank within each suit.
pub fn sort_hand(hand: &mut [Card]) {
    hand.sort_by_key(|c| (c.suit.display_precedence(), Reverse(c.rank)));
}
