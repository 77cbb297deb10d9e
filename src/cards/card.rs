//! Card values: rank, suit, and the 108-card Canastra deck.
//!
//! Cards are small `Copy` values compared by `(rank, suit)`. A deck holds two
//! copies of every suited card, so equal cards are interchangeable and
//! nothing in the engine tracks physical identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cards in a full deck (two 52-card decks plus four jokers).
pub const DECK_SIZE: usize = 108;

/// Every card is worth the same in hand and in melds.
pub const CARD_POINTS: i32 = 10;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All suits in table order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Unicode symbol for display.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    /// Single ASCII letter used by the parser.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_uppercase() {
            'C' | '♣' => Some(Suit::Clubs),
            'D' | '♦' => Some(Suit::Diamonds),
            'H' | '♥' => Some(Suit::Hearts),
            'S' | '♠' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Clubs => "clubs",
            Suit::Diamonds => "diamonds",
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
        };
        f.write_str(name)
    }
}

/// Card rank. Declaration order is the low-ace run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    /// The thirteen face ranks (no joker), ace first.
    pub const FACES: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Position in a run with the ace low (Ace = 0 .. King = 12).
    ///
    /// Returns `None` for the joker, which has no natural position.
    #[must_use]
    pub const fn run_index(self) -> Option<u8> {
        match self {
            Rank::Joker => None,
            other => Some(other as u8),
        }
    }

    /// Ranks that may form a set (house rule).
    #[must_use]
    pub const fn allowed_in_set(self) -> bool {
        matches!(self, Rank::Ace | Rank::Three | Rank::King)
    }

    /// Short label used by `Display` and the parser.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Joker => "Joker",
        }
    }

    fn from_label(label: &str) -> Option<Rank> {
        let rank = match label.to_ascii_uppercase().as_str() {
            "A" | "1" => Rank::Ace,
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            _ => return None,
        };
        Some(rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A playing card.
///
/// Jokers carry no suit. Equality and hashing are by value, so the two
/// physical copies of `5♥` in a deck compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Option<Suit>,
}

impl Card {
    /// The joker.
    pub const JOKER: Card = Card {
        rank: Rank::Joker,
        suit: None,
    };

    /// Create a suited card. Passing `Rank::Joker` yields the suitless joker.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        match rank {
            Rank::Joker => Self::JOKER,
            _ => Self {
                rank,
                suit: Some(suit),
            },
        }
    }

    #[must_use]
    pub const fn is_joker(self) -> bool {
        matches!(self.rank, Rank::Joker)
    }

    /// Twos and jokers are wild by default. Whether a two actually counts
    /// as wild depends on the meld it sits in.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self.rank, Rank::Two | Rank::Joker)
    }

    #[must_use]
    pub const fn points(self) -> i32 {
        CARD_POINTS
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            None => f.write_str("Joker"),
            Some(suit) => write!(f, "{}{}", self.rank, suit.symbol()),
        }
    }
}

/// Error returned when a card label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("empty card label")]
    Empty,
    #[error("unknown suit in {0:?}")]
    UnknownSuit(String),
    #[error("unknown rank in {0:?}")]
    UnknownRank(String),
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parse labels like `"AS"`, `"10h"`, `"2♣"` or `"Joker"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseCardError::Empty);
        }
        if s.eq_ignore_ascii_case("joker") || s == "*" {
            return Ok(Card::JOKER);
        }

        let mut chars = s.chars();
        let suit_char = chars.next_back().ok_or(ParseCardError::Empty)?;
        let suit = Suit::from_char(suit_char).ok_or_else(|| ParseCardError::UnknownSuit(s.to_string()))?;
        let rank = Rank::from_label(chars.as_str()).ok_or_else(|| ParseCardError::UnknownRank(s.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse a comma- or whitespace-separated list of cards.
///
/// ```
/// use canastra::cards::{parse_hand, Card, Rank, Suit};
///
/// let hand = parse_hand("AS, 2C KD,Joker").unwrap();
/// assert_eq!(hand.len(), 4);
/// assert_eq!(hand[0], Card::new(Rank::Ace, Suit::Spades));
/// assert_eq!(hand[3], Card::JOKER);
/// ```
pub fn parse_hand(s: &str) -> Result<Vec<Card>, ParseCardError> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// Build the unshuffled 108-card deck: four jokers, then two copies of
/// every rank/suit pair.
#[must_use]
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    deck.extend(std::iter::repeat(Card::JOKER).take(4));
    for _ in 0..2 {
        for rank in Rank::FACES {
            for suit in Suit::ALL {
                deck.push(Card::new(rank, suit));
            }
        }
    }
    deck
}

/// Total point value of a group of cards.
#[must_use]
pub fn cards_value(cards: &[Card]) -> i32 {
    cards.iter().map(|c| c.points()).sum()
}

/// Sort a hand for display: grouped by suit, ace high inside each suit, with
/// each joker placed into the first rank gap it can fill. Leftover jokers
/// go to the end.
#[must_use]
pub fn organize_hand(hand: &[Card]) -> Vec<Card> {
    let display_rank = |card: &Card| match card.rank {
        Rank::Ace => 14,
        other => other as u8 + 1,
    };

    let mut jokers = hand.iter().filter(|c| c.is_joker()).count();
    let mut organized = Vec::with_capacity(hand.len());

    for suit in Suit::ALL {
        let mut suited: Vec<Card> = hand.iter().copied().filter(|c| c.suit == Some(suit)).collect();
        suited.sort_by_key(display_rank);

        let mut i = 0;
        while jokers > 0 && i + 1 < suited.len() {
            let gap = !suited[i].is_joker()
                && !suited[i + 1].is_joker()
                && display_rank(&suited[i + 1]) > display_rank(&suited[i]) + 1;
            if gap {
                suited.insert(i + 1, Card::JOKER);
                jokers -= 1;
                i += 2;
            } else {
                i += 1;
            }
        }
        organized.extend(suited);
    }

    organized.extend(std::iter::repeat(Card::JOKER).take(jokers));
    organized
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_deck_composition() {
        let deck = full_deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let mut counts: FxHashMap<Card, usize> = FxHashMap::default();
        for card in &deck {
            *counts.entry(*card).or_default() += 1;
        }
        assert_eq!(counts[&Card::JOKER], 4);
        assert_eq!(counts[&Card::new(Rank::Five, Suit::Hearts)], 2);
        assert_eq!(counts.len(), 53);
    }

    #[test]
    fn test_value_equality() {
        let a = Card::new(Rank::Seven, Suit::Clubs);
        let b = Card::new(Rank::Seven, Suit::Clubs);
        assert_eq!(a, b);
        assert_ne!(a, Card::new(Rank::Seven, Suit::Spades));
        assert_eq!(Card::new(Rank::Joker, Suit::Hearts), Card::JOKER);
    }

    #[test]
    fn test_wildcards() {
        assert!(Card::JOKER.is_wildcard());
        assert!(Card::new(Rank::Two, Suit::Hearts).is_wildcard());
        assert!(!Card::new(Rank::Three, Suit::Hearts).is_wildcard());
    }

    #[test]
    fn test_display() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).to_string(), "A♠");
        assert_eq!(Card::new(Rank::Ten, Suit::Hearts).to_string(), "10♥");
        assert_eq!(Card::JOKER.to_string(), "Joker");
    }

    #[test]
    fn test_parse() {
        assert_eq!("10h".parse::<Card>(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
        assert_eq!("KD".parse::<Card>(), Ok(Card::new(Rank::King, Suit::Diamonds)));
        assert_eq!("2♣".parse::<Card>(), Ok(Card::new(Rank::Two, Suit::Clubs)));
        assert_eq!("joker".parse::<Card>(), Ok(Card::JOKER));
        assert!(matches!("ZX".parse::<Card>(), Err(ParseCardError::UnknownSuit(_))));
        assert!(matches!("ZH".parse::<Card>(), Err(ParseCardError::UnknownRank(_))));
        assert_eq!("".parse::<Card>(), Err(ParseCardError::Empty));
    }

    #[test]
    fn test_display_parse_agree() {
        for card in full_deck() {
            assert_eq!(card.to_string().parse::<Card>(), Ok(card));
        }
    }

    #[test]
    fn test_organize_hand_places_joker_in_gap() {
        let hand = parse_hand("7H, Joker, 5H, KS, 3C").unwrap();
        let organized = organize_hand(&hand);
        let labels: Vec<String> = organized.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["3♣", "5♥", "Joker", "7♥", "K♠"]);
    }

    #[test]
    fn test_organize_hand_leftover_jokers_last() {
        let hand = parse_hand("Joker, 5H, 6H").unwrap();
        let organized = organize_hand(&hand);
        assert_eq!(organized.last(), Some(&Card::JOKER));
        assert_eq!(organized.len(), 3);
    }
}
