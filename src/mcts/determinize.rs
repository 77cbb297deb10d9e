//! Sampling a concrete table consistent with one seat's view.
//!
//! The observer sees its own hand, every meld and the whole discard pile.
//! Its partner's hand is treated as known too.
//! Everything else, the stock, both opponents' hands and the reserve
//! piles, is pooled, shuffled and dealt back into the same slots with the
//! same sizes.

use rustc_hash::FxHashMap;

use crate::cards::{full_deck, Card};
use crate::core::{GameRng, Seat, Team};
use crate::rules::Table;

/// Cards the observer cannot place: the full deck minus its own hand, its
/// partner's hand, all melds and the discard pile. Returned in deck order.
#[must_use]
pub fn unseen_cards(table: &Table, observer: Seat) -> Vec<Card> {
    let mut known: FxHashMap<Card, usize> = FxHashMap::default();
    let mut mark = |cards: &[Card]| {
        for card in cards {
            *known.entry(*card).or_default() += 1;
        }
    };

    mark(table.player(observer).hand());
    mark(table.player(observer.partner()).hand());
    mark(table.discard_pile());
    for (_, player) in table.players() {
        for m in player.melds() {
            mark(m.cards());
        }
    }

    full_deck()
        .into_iter()
        .filter(|card| match known.get_mut(card) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

/// Clone `table` with every card hidden from `observer` redealt at random.
///
/// Stock, opponent hands and reserve piles keep their sizes. The clone
/// does not record log messages.
#[must_use]
pub fn determinize(table: &Table, observer: Seat, rng: &mut GameRng) -> Table {
    let mut clone = table.clone();
    clone.silence();

    let mut pool = unseen_cards(table, observer);
    rng.shuffle(&mut pool);
    let mut pool = pool.into_iter();

    let mut refill = |slot: &mut Vec<Card>| {
        let len = slot.len();
        slot.clear();
        slot.extend(pool.by_ref().take(len));
    };

    refill(&mut clone.stock);
    for seat in Seat::all().filter(|s| s.team() != observer.team()) {
        refill(&mut clone.players[seat].hand);
    }
    for team in Team::all() {
        refill(&mut clone.reserves[team]);
    }
    clone
}
