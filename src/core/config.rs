//! Table configuration.
//!
//! `TableConfig` fixes who sits where and how a game is dealt. The defaults
//! match the standard game: seat 0 human, three bots, 11-card hands and
//! 11-card reserve piles.

use serde::{Deserialize, Serialize};

use super::player::{Seat, SeatMap};

/// Cards dealt to each seat.
pub const DEFAULT_HAND_SIZE: usize = 11;

/// Cards set aside in each team's reserve pile.
pub const DEFAULT_RESERVE_SIZE: usize = 11;

/// Stock size above which the game counts as being in its opening phase.
pub const DEFAULT_EARLY_GAME_STOCK: usize = 40;

/// Configuration for a single game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Display names, one per seat.
    pub names: SeatMap<String>,

    /// Which seats are controlled by a person rather than a bot.
    pub human: SeatMap<bool>,

    /// Cards dealt to each seat.
    pub hand_size: usize,

    /// Cards in each team's reserve pile.
    pub reserve_size: usize,

    /// The opening phase lasts while the stock holds more than this.
    pub early_game_stock: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            names: SeatMap::new(|seat| format!("Player {}", seat.index() + 1)),
            human: SeatMap::new(|seat| seat.index() == 0),
            hand_size: DEFAULT_HAND_SIZE,
            reserve_size: DEFAULT_RESERVE_SIZE,
            early_game_stock: DEFAULT_EARLY_GAME_STOCK,
        }
    }
}

impl TableConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// All four seats played by bots.
    #[must_use]
    pub fn all_bots() -> Self {
        Self::default().with_humans(&[])
    }

    /// Set the human-controlled seats; every other seat is a bot.
    #[must_use]
    pub fn with_humans(mut self, seats: &[Seat]) -> Self {
        self.human = SeatMap::new(|seat| seats.contains(&seat));
        self
    }

    /// Rename one seat.
    #[must_use]
    pub fn with_name(mut self, seat: Seat, name: impl Into<String>) -> Self {
        self.names[seat] = name.into();
        self
    }

    /// Set the number of cards dealt to each seat.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Set the number of cards in each reserve pile.
    #[must_use]
    pub fn with_reserve_size(mut self, size: usize) -> Self {
        self.reserve_size = size;
        self
    }

    /// Set the opening-phase stock threshold.
    #[must_use]
    pub fn with_early_game_stock(mut self, cards: usize) -> Self {
        self.early_game_stock = cards;
        self
    }
}
