//! Player intents as a closed set of actions.
//!
//! Actions name cards by value, never by reference into a particular table,
//! so the same action can be tried against a determinized clone and then
//! against the real table. Applying an action that no longer fits the
//! state (a card no longer in hand, a stale meld index) fails softly.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, Suit};
use crate::rules::Table;

use super::player::Seat;

/// Cards named by a lay-down action.
pub type ActionCards = SmallVec<[Card; 8]>;

/// One step a seat can take.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Draw the top card of the stock.
    DrawStock,
    /// Take the whole discard pile.
    DrawDiscard,
    /// Lay down a new sequence of `suit`.
    LayDownSequence { suit: Suit, cards: ActionCards },
    /// Lay down a new set.
    LayDownSet { cards: ActionCards },
    /// Add `card` to meld `meld` owned by `owner` (self or partner).
    AddToMeld { owner: Seat, meld: usize, card: Card },
    /// Discard the card at `hand_index`.
    Discard { hand_index: usize },
    /// Finish laying down and move to the discard phase.
    EndLayDown,
}

impl Action {
    /// Build a sequence lay-down from a card slice.
    #[must_use]
    pub fn lay_down_sequence(suit: Suit, cards: &[Card]) -> Self {
        Action::LayDownSequence {
            suit,
            cards: SmallVec::from_slice(cards),
        }
    }

    /// Build a set lay-down from a card slice.
    #[must_use]
    pub fn lay_down_set(cards: &[Card]) -> Self {
        Action::LayDownSet {
            cards: SmallVec::from_slice(cards),
        }
    }

    #[must_use]
    pub fn is_discard(&self) -> bool {
        matches!(self, Action::Discard { .. })
    }

    /// Short human-readable description in the context of `table`.
    ///
    /// Discards are described by the card at the index in the current
    /// seat's hand.
    #[must_use]
    pub fn describe(&self, table: &Table) -> String {
        match self {
            Action::DrawStock => "Draw from the stock".to_string(),
            Action::DrawDiscard => {
                format!("Take the discard pile ({} cards)", table.discard_pile().len())
            }
            Action::LayDownSequence { suit, cards } => {
                format!("Lay down a {} sequence of {} cards", suit, cards.len())
            }
            Action::LayDownSet { cards } => format!("Lay down a set of {} cards", cards.len()),
            Action::AddToMeld { owner, card, .. } => {
                if *owner == table.current_seat() {
                    format!("Add {} to one of your melds", card)
                } else {
                    format!("Add {} to your partner's meld", card)
                }
            }
            Action::Discard { hand_index } => {
                match table.player(table.current_seat()).hand().get(*hand_index) {
                    Some(card) => format!("Discard {}", card),
                    None => "Discard a card".to_string(),
                }
            }
            Action::EndLayDown => "Finish laying down".to_string(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::DrawStock => f.write_str("draw-stock"),
            Action::DrawDiscard => f.write_str("draw-discard"),
            Action::LayDownSequence { suit, cards } => {
                write!(f, "sequence({}:", suit)?;
                for card in cards {
                    write!(f, " {}", card)?;
                }
                f.write_str(")")
            }
            Action::LayDownSet { cards } => {
                f.write_str("set(")?;
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", card)?;
                }
                f.write_str(")")
            }
            Action::AddToMeld { owner, meld, card } => {
                write!(f, "add({} -> {} meld {})", card, owner, meld)
            }
            Action::Discard { hand_index } => write!(f, "discard(#{})", hand_index),
            Action::EndLayDown => f.write_str("end-lay-down"),
        }
    }
}
