//! Deck construction, shuffling and the two-stage Hokm deal.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards_logic::sort_hand;
use crate::domain::rules::{
    DEAL_BATCH, DECK_SIZE, HAKEM_FIRST_DEAL, HAND_SIZE, OTHERS_FIRST_DEAL, PLAYERS,
};
use crate::domain::state::{seats_from, Seat};
use crate::domain::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

/// All 52 cards, one of each (suit, rank).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Uniform Fisher-Yates permutation of a fresh deck.
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = full_deck();
    deck.shuffle(rng);
    deck
}

/// Four distinct spades for hakem determination, one per seat in seat order.
pub fn draw_hakem_spades<R: Rng + ?Sized>(rng: &mut R) -> [Card; PLAYERS] {
    let mut spades = Rank::ALL.map(|rank| Card::new(Suit::Spades, rank));
    spades.shuffle(rng);
    [spades[0], spades[1], spades[2], spades[3]]
}

/// First stage: the top five cards go to the hakem, the rest are held back.
pub fn split_hakem_first(mut deck: Vec<Card>) -> (Vec<Card>, Vec<Card>) {
    let stock = deck.split_off(HAKEM_FIRST_DEAL.min(deck.len()));
    (deck, stock)
}

/// Second stage: five cards to each non-hakem seat in traversal order, then
/// batches of up to four round-robin (hakem first) until every hand holds 13.
///
/// `hands` is indexed by seat and must arrive with only the hakem's five cards.
/// Every hand is sorted on return. Fails without touching `hands` if the stock
/// does not exactly fill the table.
pub fn complete_deal(
    stock: &[Card],
    hands: &mut [Vec<Card>; PLAYERS],
    hakem: Seat,
) -> Result<(), DomainError> {
    let held: usize = hands.iter().map(Vec::len).sum();
    if held + stock.len() != DECK_SIZE || hands[hakem as usize].len() != HAKEM_FIRST_DEAL {
        return Err(DomainError::validation(
            ValidationKind::InvariantViolated,
            format!(
                "deal cannot complete: {held} cards held, {} in stock",
                stock.len()
            ),
        ));
    }

    let mut dealt: [Vec<Card>; PLAYERS] = hands.clone();
    let order = seats_from(hakem);
    let mut next = 0usize;

    for &seat in &order[1..] {
        let take = OTHERS_FIRST_DEAL.min(stock.len() - next);
        dealt[seat as usize].extend_from_slice(&stock[next..next + take]);
        next += take;
    }

    while next < stock.len() {
        let before = next;
        for &seat in &order {
            let hand = &mut dealt[seat as usize];
            let take = DEAL_BATCH
                .min(HAND_SIZE.saturating_sub(hand.len()))
                .min(stock.len() - next);
            hand.extend_from_slice(&stock[next..next + take]);
            next += take;
        }
        if next == before {
            break;
        }
    }

    if next != stock.len() || dealt.iter().any(|h| h.len() != HAND_SIZE) {
        return Err(DomainError::validation(
            ValidationKind::InvariantViolated,
            "deal left cards undistributed or hands short",
        ));
    }

    for hand in dealt.iter_mut() {
        sort_hand(hand);
    }
    *hands = dealt;
    Ok(())
}
