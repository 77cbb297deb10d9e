//! Builder for tables in a chosen position.
//!
//! Tests, benchmarks and the blunder scenarios need tables that are not a
//! fresh deal: a particular hand, a meld already on the table, a known
//! discard pile. `TableSetup` takes the parts you care about and deals the
//! rest from whatever is left of the deck.
//!
//! Cards are taken from a single 108-card deck, so naming the same card
//! more often than the deck holds it is an error. When the stock is given
//! explicitly (or sized with `with_stock_size`), cards left over after
//! filling every other pile are set aside and the table holds fewer than
//! 108 cards.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::cards::{full_deck, Card, Meld, MeldError, MeldKind, Suit};
use crate::core::{GameRng, Seat, SeatMap, TableConfig, Team, TeamMap};

use super::engine::{PlayerState, Table, TurnPhase};

/// Why a setup could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("{0} is used more times than the deck holds it")]
    CardUnavailable(Card),

    #[error("meld for {seat} is invalid: {source}")]
    InvalidMeld { seat: Seat, source: MeldError },

    #[error("not enough cards left to deal: needed {needed}, {available} left")]
    NotEnoughCards { needed: usize, available: usize },
}

/// Builder for a `Table` in an arbitrary position.
#[derive(Clone, Debug)]
pub struct TableSetup {
    config: TableConfig,
    hands: SeatMap<Option<Vec<Card>>>,
    melds: SeatMap<Vec<(MeldKind, Vec<Card>)>>,
    discard: Vec<Card>,
    stock: Option<Vec<Card>>,
    stock_size: Option<usize>,
    reserves: TeamMap<Option<Vec<Card>>>,
    received: SeatMap<bool>,
    current: Seat,
    phase: TurnPhase,
    pending: Option<Seat>,
    seed: u64,
}

impl Default for TableSetup {
    fn default() -> Self {
        Self {
            config: TableConfig::default(),
            hands: SeatMap::new(|_| None),
            melds: SeatMap::new(|_| Vec::new()),
            discard: Vec::new(),
            stock: None,
            stock_size: None,
            reserves: TeamMap::default(),
            received: SeatMap::with_value(false),
            current: Seat(0),
            phase: TurnPhase::Draw,
            pending: None,
            seed: 0,
        }
    }
}

impl TableSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix a seat's hand.
    pub fn with_hand(mut self, seat: Seat, cards: &[Card]) -> Self {
        self.hands[seat] = Some(cards.to_vec());
        self
    }

    /// Put a sequence on the table in front of `seat`.
    pub fn with_sequence(mut self, seat: Seat, suit: Suit, cards: &[Card]) -> Self {
        self.melds[seat].push((MeldKind::Sequence(suit), cards.to_vec()));
        self
    }

    /// Put a set on the table in front of `seat`.
    pub fn with_set(mut self, seat: Seat, cards: &[Card]) -> Self {
        self.melds[seat].push((MeldKind::Set, cards.to_vec()));
        self
    }

    /// Discard pile, bottom first.
    pub fn with_discard(mut self, cards: &[Card]) -> Self {
        self.discard = cards.to_vec();
        self
    }

    /// Stock, bottom first (the last card is drawn first).
    pub fn with_stock(mut self, cards: &[Card]) -> Self {
        self.stock = Some(cards.to_vec());
        self
    }

    /// Deal a stock of exactly `size` cards from what is left.
    pub fn with_stock_size(mut self, size: usize) -> Self {
        self.stock_size = Some(size);
        self
    }

    /// Fix a team's reserve pile.
    pub fn with_reserve(mut self, team: Team, cards: &[Card]) -> Self {
        self.reserves[team] = Some(cards.to_vec());
        self
    }

    /// Mark a seat as having already picked up its team's reserve. The
    /// team's reserve pile is then empty unless given explicitly.
    pub fn with_received_reserve(mut self, seat: Seat) -> Self {
        self.received[seat] = true;
        self
    }

    /// Owe a seat its team's reserve on its next turn.
    pub fn with_pending_reserve(mut self, seat: Seat) -> Self {
        self.pending = Some(seat);
        self
    }

    pub fn with_current(mut self, seat: Seat) -> Self {
        self.current = seat;
        self
    }

    pub fn with_phase(mut self, phase: TurnPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Seed for shuffling the undealt cards.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the table.
    pub fn build(self) -> Result<Table, SetupError> {
        let mut pool: FxHashMap<Card, usize> = FxHashMap::default();
        for card in full_deck() {
            *pool.entry(card).or_default() += 1;
        }
        let mut claim = |cards: &[Card]| -> Result<(), SetupError> {
            for card in cards {
                match pool.get_mut(card) {
                    Some(n) if *n > 0 => *n -= 1,
                    _ => return Err(SetupError::CardUnavailable(*card)),
                }
            }
            Ok(())
        };

        for hand in self.hands.values().flatten() {
            claim(hand)?;
        }
        for melds in self.melds.values() {
            for (_, cards) in melds {
                claim(cards)?;
            }
        }
        claim(&self.discard)?;
        if let Some(stock) = &self.stock {
            claim(stock)?;
        }
        for (_, reserve) in self.reserves.iter() {
            if let Some(cards) = reserve {
                claim(cards)?;
            }
        }

        // Remaining cards in deck order, then shuffled.
        let mut rest: Vec<Card> = Vec::new();
        for card in full_deck() {
            if let Some(n) = pool.get_mut(&card) {
                if *n > 0 {
                    *n -= 1;
                    rest.push(card);
                }
            }
        }
        let mut rng = GameRng::new(self.seed);
        rng.shuffle(&mut rest);

        let mut deal = |count: usize| -> Result<Vec<Card>, SetupError> {
            if count > rest.len() {
                return Err(SetupError::NotEnoughCards {
                    needed: count,
                    available: rest.len(),
                });
            }
            Ok(rest.split_off(rest.len() - count))
        };

        let config = self.config;
        let mut players = SeatMap::new(|seat| {
            let mut player = PlayerState::new(config.names[seat].clone(), seat.team(), config.human[seat]);
            player.has_received_reserve = self.received[seat];
            player
        });

        for seat in Seat::all() {
            players[seat].hand = match &self.hands[seat] {
                Some(cards) => cards.clone(),
                None => deal(config.hand_size)?,
            };
            for (kind, cards) in &self.melds[seat] {
                let meld = Meld::new(*kind, cards).map_err(|source| SetupError::InvalidMeld { seat, source })?;
                players[seat].melds.push(meld);
            }
        }

        let mut reserves: TeamMap<Vec<Card>> = TeamMap::default();
        for team in Team::all() {
            let claimed = team.seats().iter().any(|s| self.received[*s]);
            reserves[team] = match &self.reserves[team] {
                Some(cards) => cards.clone(),
                None if claimed => Vec::new(),
                None => deal(config.reserve_size)?,
            };
        }

        let stock = match (self.stock, self.stock_size) {
            (Some(cards), _) => cards,
            (None, Some(size)) => deal(size)?,
            (None, None) => std::mem::take(&mut rest),
        };

        let mut table = Table::assemble(config, players, stock, self.discard, reserves, self.current, self.phase);
        table.pending_reserve = self.pending;
        Ok(table)
    }
}
