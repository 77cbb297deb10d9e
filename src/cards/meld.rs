//! Meld validation: sequences (runs of one suit) and sets (one rank).
//!
//! ## Wildcards
//!
//! Jokers are always wild. A two is wild in a set and in a sequence of a
//! different suit, but a two of the sequence's own suit is a natural card.
//! A natural two may also stand in for one missing rank of its run without
//! being counted as a wildcard; while it does so, the meld has no room left
//! for another wildcard.
//!
//! ## Ace placement
//!
//! The ace may sit below the two or above the king. A meld is scored with
//! whichever placement leaves fewer gaps, so one meld can never use both.
//!
//! Every constructor and mutation validates the full card list and returns a
//! `MeldError` instead of leaving a partially modified meld behind.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::card::{Card, Rank, Suit, CARD_POINTS};

/// Minimum number of cards in a meld.
pub const MIN_MELD_SIZE: usize = 3;

/// Size at which a meld becomes a canastra.
pub const CANASTRA_SIZE: usize = 7;

/// Bonus for a canastra without wildcards.
pub const CLEAN_CANASTRA_BONUS: i32 = 200;

/// Bonus for a canastra with one wildcard.
pub const DIRTY_CANASTRA_BONUS: i32 = 100;

/// Position of the ace when played above the king.
const ACE_HIGH_INDEX: u8 = 13;

/// Card storage sized for a typical meld.
pub type MeldCards = SmallVec<[Card; 8]>;

/// Kind of meld.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// Run of consecutive ranks in one suit.
    Sequence(Suit),
    /// Group of one rank (aces, threes or kings only).
    Set,
}

impl std::fmt::Display for MeldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeldKind::Sequence(suit) => write!(f, "{} sequence", suit),
            MeldKind::Set => f.write_str("set"),
        }
    }
}

/// Why a group of cards is not a valid meld.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeldError {
    #[error("a meld needs at least {MIN_MELD_SIZE} cards, got {0}")]
    TooFewCards(usize),

    #[error("only one wildcard is allowed per meld")]
    TooManyWildcards,

    #[error("a {0} needs at least 2 natural cards")]
    TooFewNaturals(MeldKind),

    #[error("{card} does not belong in a {suit} sequence")]
    WrongSuit { card: Card, suit: Suit },

    #[error("a sequence cannot hold two {0}s")]
    DuplicateRank(Rank),

    #[error("the wildcard cannot cover more than one missing rank")]
    GapTooWide,

    #[error("cards do not form a run")]
    NotARun,

    #[error("a set must contain a single rank")]
    MixedRanks,

    #[error("sets may only be made of aces, threes or kings, not {0}")]
    RankNotAllowed(Rank),
}

/// Does `card` count against the one-wildcard limit of a `suit` sequence?
#[must_use]
pub fn counts_as_wild_in_sequence(card: Card, suit: Suit) -> bool {
    card.is_joker() || (card.rank == Rank::Two && card.suit != Some(suit))
}

/// Does `card` count against the wildcard limit of a meld of this kind?
#[must_use]
pub fn counts_as_wild(card: Card, kind: MeldKind) -> bool {
    match kind {
        MeldKind::Sequence(suit) => counts_as_wild_in_sequence(card, suit),
        MeldKind::Set => card.is_wildcard(),
    }
}

/// Number of missing ranks between the lowest and highest of `ranks`,
/// taking the better of ace-low and ace-high placement.
///
/// Ranks must be distinct naturals (no joker).
fn run_gaps(ranks: &[Rank]) -> u32 {
    if ranks.len() < 2 {
        return 0;
    }

    let span = |high_ace: bool| -> u32 {
        let mut lo = u8::MAX;
        let mut hi = 0u8;
        for rank in ranks {
            let idx = match (rank, high_ace) {
                (Rank::Ace, true) => ACE_HIGH_INDEX,
                (other, _) => other.run_index().unwrap_or(0),
            };
            lo = lo.min(idx);
            hi = hi.max(idx);
        }
        u32::from(hi - lo) + 1 - ranks.len() as u32
    };

    if ranks.contains(&Rank::Ace) {
        span(false).min(span(true))
    } else {
        span(false)
    }
}

fn validate_sequence(suit: Suit, cards: &[Card]) -> Result<(), MeldError> {
    let wild = cards.iter().filter(|c| counts_as_wild_in_sequence(**c, suit)).count();
    if wild > 1 {
        return Err(MeldError::TooManyWildcards);
    }

    if let Some(card) = cards.iter().find(|c| !c.is_wildcard() && c.suit != Some(suit)) {
        return Err(MeldError::WrongSuit { card: *card, suit });
    }

    let mut ranks: SmallVec<[Rank; 14]> = cards
        .iter()
        .filter(|c| c.suit == Some(suit))
        .map(|c| c.rank)
        .collect();
    if ranks.len() < 2 {
        return Err(MeldError::TooFewNaturals(MeldKind::Sequence(suit)));
    }

    ranks.sort_unstable();
    if let Some(pair) = ranks.windows(2).find(|w| w[0] == w[1]) {
        return Err(MeldError::DuplicateRank(pair[0]));
    }

    let gaps = run_gaps(&ranks);
    if wild == 1 {
        return match gaps {
            0 | 1 => Ok(()),
            // A natural two already stands in elsewhere in this run.
            _ if ranks.contains(&Rank::Two) && stand_in_closes(&ranks) => Err(MeldError::TooManyWildcards),
            _ => Err(MeldError::GapTooWide),
        };
    }

    if gaps == 0 || stand_in_closes(&ranks) {
        Ok(())
    } else {
        Err(MeldError::NotARun)
    }
}

/// With the suit's own two pulled out of its natural slot, do the remaining
/// ranks leave at most one gap for it to fill?
fn stand_in_closes(ranks: &[Rank]) -> bool {
    if !ranks.contains(&Rank::Two) {
        return false;
    }
    let others: SmallVec<[Rank; 14]> = ranks.iter().copied().filter(|r| *r != Rank::Two).collect();
    others.len() >= 2 && run_gaps(&others) <= 1
}

fn validate_set(cards: &[Card]) -> Result<(), MeldError> {
    let wild = cards.iter().filter(|c| c.is_wildcard()).count();
    if wild > 1 {
        return Err(MeldError::TooManyWildcards);
    }

    let mut naturals = cards.iter().filter(|c| !c.is_wildcard()).map(|c| c.rank);
    let first = naturals.next();
    let mut count = usize::from(first.is_some());
    for rank in naturals {
        if Some(rank) != first {
            return Err(MeldError::MixedRanks);
        }
        count += 1;
    }

    match first {
        Some(rank) if count >= 2 => {
            if rank.allowed_in_set() {
                Ok(())
            } else {
                Err(MeldError::RankNotAllowed(rank))
            }
        }
        _ => Err(MeldError::TooFewNaturals(MeldKind::Set)),
    }
}

/// Validate a card list as a meld of the given kind.
pub fn validate(kind: MeldKind, cards: &[Card]) -> Result<(), MeldError> {
    if cards.len() < MIN_MELD_SIZE {
        return Err(MeldError::TooFewCards(cards.len()));
    }
    match kind {
        MeldKind::Sequence(suit) => validate_sequence(suit, cards),
        MeldKind::Set => validate_set(cards),
    }
}

/// A validated group of cards on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    kind: MeldKind,
    cards: MeldCards,
}

impl Meld {
    /// Build a meld, rejecting any card list that is not a legal meld.
    pub fn new(kind: MeldKind, cards: &[Card]) -> Result<Self, MeldError> {
        validate(kind, cards)?;
        Ok(Self {
            kind,
            cards: SmallVec::from_slice(cards),
        })
    }

    /// Build a sequence of `suit`.
    pub fn sequence(suit: Suit, cards: &[Card]) -> Result<Self, MeldError> {
        Self::new(MeldKind::Sequence(suit), cards)
    }

    /// Build a set.
    pub fn set(cards: &[Card]) -> Result<Self, MeldError> {
        Self::new(MeldKind::Set, cards)
    }

    #[must_use]
    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards counting against the wildcard limit.
    #[must_use]
    pub fn wildcard_count(&self) -> usize {
        self.cards.iter().filter(|c| counts_as_wild(**c, self.kind)).count()
    }

    /// Is a natural two currently filling a missing rank of this run?
    #[must_use]
    pub fn has_stand_in(&self) -> bool {
        match self.kind {
            MeldKind::Sequence(suit) => {
                if self.wildcard_count() > 0 {
                    return false;
                }
                let mut ranks: SmallVec<[Rank; 14]> = self
                    .cards
                    .iter()
                    .filter(|c| c.suit == Some(suit))
                    .map(|c| c.rank)
                    .collect();
                ranks.sort_unstable();
                ranks.contains(&Rank::Two) && run_gaps(&ranks) > 0
            }
            MeldKind::Set => false,
        }
    }

    /// Check whether `card` could extend this meld, with the reason if not.
    pub fn check_add(&self, card: Card) -> Result<(), MeldError> {
        if counts_as_wild(card, self.kind) {
            // A stand-in two may return to its natural slot, so the
            // candidate run decides.
            if self.wildcard_count() > 0 {
                return Err(MeldError::TooManyWildcards);
            }
        } else {
            match self.kind {
                MeldKind::Sequence(suit) => {
                    if card.suit != Some(suit) {
                        return Err(MeldError::WrongSuit { card, suit });
                    }
                    if self.cards.iter().any(|c| c.suit == Some(suit) && c.rank == card.rank) {
                        return Err(MeldError::DuplicateRank(card.rank));
                    }
                }
                MeldKind::Set => {
                    if !card.rank.allowed_in_set() {
                        return Err(MeldError::RankNotAllowed(card.rank));
                    }
                    if self.cards.iter().any(|c| !c.is_wildcard() && c.rank != card.rank) {
                        return Err(MeldError::MixedRanks);
                    }
                }
            }
        }

        let mut candidate = self.cards.clone();
        candidate.push(card);
        validate(self.kind, &candidate)
    }

    /// Could `card` legally extend this meld?
    #[must_use]
    pub fn can_add(&self, card: Card) -> bool {
        self.check_add(card).is_ok()
    }

    /// Extend the meld. On error the meld is unchanged.
    pub fn add_card(&mut self, card: Card) -> Result<(), MeldError> {
        self.check_add(card)?;
        self.cards.push(card);
        Ok(())
    }

    /// Remove the most recently added card. Only the engine uses this, to
    /// undo an addition whose knock was rejected.
    pub(crate) fn pop_last(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    #[must_use]
    pub fn is_canastra(&self) -> bool {
        self.cards.len() >= CANASTRA_SIZE
    }

    #[must_use]
    pub fn is_clean_canastra(&self) -> bool {
        self.is_canastra() && self.wildcard_count() == 0
    }

    #[must_use]
    pub fn is_dirty_canastra(&self) -> bool {
        self.is_canastra() && self.wildcard_count() == 1
    }

    /// Card points plus the canastra bonus.
    #[must_use]
    pub fn point_value(&self) -> i32 {
        let base = self.cards.len() as i32 * CARD_POINTS;
        if self.is_clean_canastra() {
            base + CLEAN_CANASTRA_BONUS
        } else if self.is_dirty_canastra() {
            base + DIRTY_CANASTRA_BONUS
        } else {
            base
        }
    }
}

impl std::fmt::Display for Meld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [", self.kind)?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", card)?;
        }
        f.write_str("]")
    }
}

// =============================================================================
// Shape detection
// =============================================================================

/// Which kinds of meld a selection of cards could form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeldShape {
    /// Not a legal meld.
    None,
    /// Only a set.
    Set,
    /// Only sequences, in the listed suits.
    Sequence(SmallVec<[Suit; 4]>),
    /// A set, and also sequences in the listed suits.
    Either(SmallVec<[Suit; 4]>),
}

/// Can `cards` form a sequence of `suit`?
#[must_use]
pub fn can_form_sequence(cards: &[Card], suit: Suit) -> bool {
    validate(MeldKind::Sequence(suit), cards).is_ok()
}

/// Can `cards` form a set?
#[must_use]
pub fn can_form_set(cards: &[Card]) -> bool {
    validate(MeldKind::Set, cards).is_ok()
}

/// Classify a selection of cards by the melds it could form.
#[must_use]
pub fn detect_meld_kind(cards: &[Card]) -> MeldShape {
    let suits: SmallVec<[Suit; 4]> = Suit::ALL
        .iter()
        .copied()
        .filter(|suit| can_form_sequence(cards, *suit))
        .collect();
    match (can_form_set(cards), suits.is_empty()) {
        (true, true) => MeldShape::Set,
        (true, false) => MeldShape::Either(suits),
        (false, false) => MeldShape::Sequence(suits),
        (false, true) => MeldShape::None,
    }
}
