//! Action enumeration and application.
//!
//! ## Enumeration modes
//!
//! - `legal_actions`: every distinct option. Used where the compute budget
//!   is generous (the advisory search).
//! - `abstract_actions`: a capped random sample of "add to meld" and
//!   discard options, for in-game search and rollouts.
//!
//! Both modes offer at most one new meld, found greedily by
//! `find_meld_in_hand`, and never abstract the draw or end-of-lay-down
//! choices.
//!
//! Cards with equal value are interchangeable, so each distinct card in hand
//! yields at most one option of each kind. Every returned action applies
//! successfully to the table it was generated from.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::cards::{meld, Card, MeldKind, Rank, Suit, CANASTRA_SIZE, MIN_MELD_SIZE};
use crate::core::{Action, GameRng};

use super::engine::{Table, TurnPhase};

/// Ceilings on the abstracted branching factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AbstractionCaps {
    pub max_add_to_meld: usize,
    pub max_discard: usize,
}

impl AbstractionCaps {
    /// Caps for the decision being searched.
    pub const ROOT: Self = Self {
        max_add_to_meld: 3,
        max_discard: 6,
    };

    /// Tighter caps used inside rollouts.
    pub const ROLLOUT: Self = Self {
        max_add_to_meld: 2,
        max_discard: 4,
    };
}

impl Default for AbstractionCaps {
    fn default() -> Self {
        Self::ROOT
    }
}

/// Every distinct legal action for the current seat.
#[must_use]
pub fn legal_actions(table: &Table) -> Vec<Action> {
    match table.phase() {
        TurnPhase::Draw => draw_actions(table),
        TurnPhase::LayDown => {
            let mut actions = add_to_meld_actions(table, false);
            if let Some(action) = find_meld_in_hand(table.current_player().hand()) {
                actions.push(action);
            }
            retain_applicable(table, &mut actions);
            actions.push(Action::EndLayDown);
            actions
        }
        TurnPhase::Discard => {
            let mut actions = discard_actions(table);
            retain_applicable(table, &mut actions);
            actions
        }
        TurnPhase::Ended => Vec::new(),
    }
}

/// A small sample of legal actions for the current seat.
///
/// At most `caps.max_add_to_meld` additions (one target meld per card) and
/// `caps.max_discard` discards are kept.
pub fn abstract_actions(table: &Table, rng: &mut GameRng, caps: AbstractionCaps) -> Vec<Action> {
    match table.phase() {
        TurnPhase::Draw => draw_actions(table),
        TurnPhase::LayDown => {
            let mut adds = add_to_meld_actions(table, true);
            retain_applicable(table, &mut adds);
            let mut actions = sample(adds, caps.max_add_to_meld, rng);

            if let Some(action) = find_meld_in_hand(table.current_player().hand()) {
                if applies_cleanly(table, &action) {
                    actions.push(action);
                }
            }
            actions.push(Action::EndLayDown);
            actions
        }
        TurnPhase::Discard => {
            let mut actions = discard_actions(table);
            retain_applicable(table, &mut actions);
            sample(actions, caps.max_discard, rng)
        }
        TurnPhase::Ended => Vec::new(),
    }
}

/// Execute one action against the table. Stale or illegal actions fail
/// softly and leave the table unchanged.
pub fn apply_action(table: &mut Table, action: &Action) -> bool {
    let result = match action {
        Action::DrawStock => table.draw_from_stock(),
        Action::DrawDiscard => table.draw_from_discard(),
        Action::LayDownSequence { suit, cards } => table.lay_down_sequence(*suit, cards),
        Action::LayDownSet { cards } => table.lay_down_set(cards),
        Action::AddToMeld { owner, meld, card } => table.add_to_meld(*meld, *card, Some(*owner)),
        Action::Discard { hand_index } => {
            let Some(card) = table.current_player().hand().get(*hand_index).copied() else {
                return false;
            };
            table.discard(card)
        }
        Action::EndLayDown => table.end_lay_down_phase(),
    };
    result.is_ok()
}

fn draw_actions(table: &Table) -> Vec<Action> {
    let mut actions = Vec::with_capacity(2);
    if !table.stock().is_empty() {
        actions.push(Action::DrawStock);
    }
    if !table.discard_pile().is_empty() {
        actions.push(Action::DrawDiscard);
    }
    actions
}

fn add_to_meld_actions(table: &Table, first_target_only: bool) -> Vec<Action> {
    let seat = table.current_seat();
    let mut seen = FxHashSet::default();
    let mut actions = Vec::new();

    for &card in table.player(seat).hand() {
        if !seen.insert(card) {
            continue;
        }
        for (owner, index, m) in table.team_melds(seat.team()) {
            if m.can_add(card) {
                actions.push(Action::AddToMeld {
                    owner,
                    meld: index,
                    card,
                });
                if first_target_only {
                    break;
                }
            }
        }
    }
    actions
}

fn discard_actions(table: &Table) -> Vec<Action> {
    let mut seen = FxHashSet::default();
    table
        .current_player()
        .hand()
        .iter()
        .enumerate()
        .filter(|(_, card)| seen.insert(**card))
        .map(|(hand_index, _)| Action::Discard { hand_index })
        .collect()
}

/// Drop actions that would leave the hand with at most one card and are
/// refused by the knock rules. Other actions are legal by construction.
fn retain_applicable(table: &Table, actions: &mut Vec<Action>) {
    let hand_len = table.current_player().hand().len();
    actions.retain(|action| {
        let used = match action {
            Action::AddToMeld { .. } | Action::Discard { .. } => 1,
            Action::LayDownSequence { cards, .. } | Action::LayDownSet { cards } => cards.len(),
            _ => 0,
        };
        used == 0 || hand_len > used + 1 || applies_cleanly(table, action)
    });
}

fn applies_cleanly(table: &Table, action: &Action) -> bool {
    let mut trial = table.clone();
    trial.silence();
    apply_action(&mut trial, action)
}

fn sample(mut actions: Vec<Action>, cap: usize, rng: &mut GameRng) -> Vec<Action> {
    if actions.len() <= cap {
        return actions;
    }
    let picked = rng.sample_indices(actions.len(), cap);
    let mut out = Vec::with_capacity(cap);
    for &i in &picked {
        out.push(std::mem::replace(&mut actions[i], Action::EndLayDown));
    }
    out
}

// =============================================================================
// Greedy meld finder
// =============================================================================

/// Find one new meld the hand can lay down, if any.
///
/// Three-card melds are tried first, then four to seven cards. Within each
/// size, a suit's sequence is tried before a set, suits in `Suit::ALL`
/// order. The first hit wins.
#[must_use]
pub fn find_meld_in_hand(hand: &[Card]) -> Option<Action> {
    for suit in Suit::ALL {
        if let Some(action) = find_sized_meld(hand, suit, MIN_MELD_SIZE) {
            return Some(action);
        }
    }

    for suit in Suit::ALL {
        for size in (MIN_MELD_SIZE + 1)..=CANASTRA_SIZE.min(hand.len()) {
            if let Some(action) = find_sized_meld(hand, suit, size) {
                return Some(action);
            }
        }
    }
    None
}

fn find_sized_meld(hand: &[Card], suit: Suit, size: usize) -> Option<Action> {
    let pool = sequence_pool(hand, suit);
    if let Some(cards) = first_combination(&pool, size, |c| {
        meld::validate(MeldKind::Sequence(suit), c).is_ok()
    }) {
        return Some(Action::lay_down_sequence(suit, &cards));
    }
    find_set(hand, size).map(|cards| Action::lay_down_set(&cards))
}

/// Distinct cards that could take part in a sequence of `suit`: each
/// same-suit rank once, plus one joker and one off-suit two as wild
/// candidates.
fn sequence_pool(hand: &[Card], suit: Suit) -> SmallVec<[Card; 16]> {
    let mut pool: SmallVec<[Card; 16]> = SmallVec::new();
    let mut joker = None;
    let mut off_suit_two = None;

    for &card in hand {
        if card.suit == Some(suit) {
            if !pool.contains(&card) {
                pool.push(card);
            }
        } else if card.is_joker() {
            joker.get_or_insert(card);
        } else if card.rank == Rank::Two {
            off_suit_two.get_or_insert(card);
        }
    }
    pool.extend(joker);
    pool.extend(off_suit_two);
    pool
}

/// `size` natural A, 3 or K, or one natural short and a wildcard (twos
/// are spent before jokers).
fn find_set(hand: &[Card], size: usize) -> Option<SmallVec<[Card; 8]>> {
    let wild = hand
        .iter()
        .find(|c| c.rank == Rank::Two)
        .or_else(|| hand.iter().find(|c| c.is_joker()))
        .copied();

    for rank in [Rank::Ace, Rank::Three, Rank::King] {
        let naturals: SmallVec<[Card; 8]> = hand.iter().filter(|c| c.rank == rank).copied().collect();
        if naturals.len() >= size {
            return Some(naturals[..size].iter().copied().collect());
        }
        if naturals.len() + 1 == size {
            if let Some(w) = wild {
                let mut cards = naturals;
                cards.push(w);
                return Some(cards);
            }
        }
    }
    None
}

/// First `size`-card combination of `pool` (in lexicographic index order)
/// accepted by `accept`.
fn first_combination(
    pool: &[Card],
    size: usize,
    mut accept: impl FnMut(&[Card]) -> bool,
) -> Option<SmallVec<[Card; 8]>> {
    let n = pool.len();
    if size == 0 || size > n {
        return None;
    }

    let mut idx: SmallVec<[usize; 8]> = (0..size).collect();
    let mut combo: SmallVec<[Card; 8]> = SmallVec::with_capacity(size);
    loop {
        combo.clear();
        combo.extend(idx.iter().map(|&i| pool[i]));
        if accept(&combo) {
            return Some(combo);
        }

        // Advance to the next combination.
        let mut i = size;
        loop {
            if i == 0 {
                return None;
            }
            i -= 1;
            if idx[i] != i + n - size {
                break;
            }
        }
        idx[i] += 1;
        for j in (i + 1)..size {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
