//! # canastra
//!
//! Rules engine and search bots for four-player partnership Canastra.
//!
//! ## Design Principles
//!
//! 1. **Rules Own the State**: every mutation goes through a `Table`
//!    operation that validates first and leaves the table untouched on
//!    error.
//!
//! 2. **Cards Are Values**: the two copies of a card are interchangeable,
//!    so conservation is checked as a multiset over the 108-card deck.
//!
//! 3. **Bots See What Players See**: the search never reads hidden cards
//!    from the real table; it redeals them for every sample.
//!
//! ## Architecture
//!
//! - **Turn State Machine**: draw, lay-down and discard phases, with
//!   reserve pickup ("knocking") on emptying a hand.
//!
//! - **IS-MCTS**: a bandit over the root's actions, each sample on a fresh
//!   determinization, with short biased rollouts and a static heuristic.
//!
//! ## Modules
//!
//! - `core`: seats, teams, actions, RNG, table configuration
//! - `cards`: cards, the deck, meld validation
//! - `rules`: the table, turn phases, legal actions, scoring
//! - `mcts`: determinization and search, bot and advisory entry points
//! - `arena`: headless matches and blunder positions for benchmarking

pub mod core;
pub mod cards;
pub mod rules;
pub mod mcts;
pub mod arena;

// Re-export commonly used types
pub use crate::core::{Action, GameRng, Seat, SeatMap, TableConfig, Team, TeamMap};

pub use crate::cards::{Card, Meld, MeldError, MeldKind, Rank, Suit};

pub use crate::rules::{
    apply_action, legal_actions, KnockKind, RuleError, ScoreSummary, SetupError, Table, TableSetup, TurnPhase,
};

pub use crate::mcts::{advise, play_ai_turn, Advice, AiConfig, IsMctsSearch, SearchConfig};

pub use crate::arena::{play_match, Bot, MatchConfig, MatchResult};
