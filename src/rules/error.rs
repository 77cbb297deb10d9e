//! Rule violations reported by the table.
//!
//! Every mutating `Table` operation returns `Result<(), RuleError>`. An
//! error always means the table was left exactly as it was before the call.

use thiserror::Error;

use crate::cards::{Card, MeldError};
use crate::core::Seat;

use super::engine::TurnPhase;

/// A rejected player intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("the game is over")]
    GameOver,

    #[error("cannot {action} during the {actual} phase (only during {expected})")]
    WrongPhase {
        action: &'static str,
        expected: TurnPhase,
        actual: TurnPhase,
    },

    #[error("the discard pile is empty")]
    EmptyDiscardPile,

    #[error("{0} is not in your hand")]
    CardNotInHand(Card),

    #[error("{owner} has no meld number {index}")]
    NoSuchMeld { owner: Seat, index: usize },

    #[error("you may only add cards to your own team's melds ({owner} is an opponent)")]
    OpponentMeld { owner: Seat },

    #[error("invalid meld: {0}")]
    InvalidMeld(#[from] MeldError),

    #[error("your team needs a clean canastra on the table before it can go out")]
    CleanCanastraRequired,

    #[error("that play would leave a single card your team cannot go out with (no clean canastra yet)")]
    WouldStrandLastCard,
}

/// A broken table invariant, found by `Table::check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("table holds {actual} cards, expected {expected}")]
    CardCount { expected: usize, actual: usize },

    #[error("{card} appears {actual} times, expected {expected}")]
    CardMultiplicity {
        card: Card,
        expected: usize,
        actual: usize,
    },

    #[error("meld {index} of {owner} no longer validates: {source}")]
    InvalidMeld {
        owner: Seat,
        index: usize,
        source: MeldError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn test_messages_are_descriptive() {
        let err = RuleError::WrongPhase {
            action: "discard",
            expected: TurnPhase::Discard,
            actual: TurnPhase::Draw,
        };
        assert_eq!(
            err.to_string(),
            "cannot discard during the draw phase (only during discard)"
        );

        let err = RuleError::CardNotInHand(Card::new(Rank::Four, Suit::Spades));
        assert_eq!(err.to_string(), "4♠ is not in your hand");
    }

    #[test]
    fn test_meld_error_converts() {
        let err: RuleError = MeldError::TooManyWildcards.into();
        assert!(err.to_string().contains("only one wildcard"));
    }
}
