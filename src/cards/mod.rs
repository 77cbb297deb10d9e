//! Card model and meld validation.
//!
//! ## Key Types
//!
//! - `Card`: a `(rank, suit)` value; jokers are suitless
//! - `Meld`: a validated sequence or set laid down on the table
//! - `MeldError`: why a group of cards is not a legal meld
//!
//! Cards compare by value. Two physical copies of `7♣` are the same card as
//! far as every rule is concerned.

pub mod card;
pub mod meld;

pub use card::{
    cards_value, full_deck, organize_hand, parse_hand, Card, ParseCardError, Rank, Suit,
    CARD_POINTS, DECK_SIZE,
};
pub use meld::{
    can_form_sequence, can_form_set, counts_as_wild, detect_meld_kind, Meld, MeldCards,
    MeldError, MeldKind, MeldShape, CANASTRA_SIZE, MIN_MELD_SIZE,
};
