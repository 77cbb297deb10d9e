//! Information-set Monte Carlo search for the bots.
//!
//! ## Overview
//!
//! Each decision is a bandit over the seat's candidate actions:
//!
//! - **Determinization**: every sample redeals the cards the seat cannot
//!   see, so hidden information is never read from the real table
//! - **Selection**: round-robin once, then UCB1 over sampled means
//! - **Rollouts**: short, biased towards taking a useful discard pile,
//!   scored by final points or a static heuristic
//! - **Risk terms**: discard danger and early-set penalties adjust the
//!   final choice
//!
//! ## Usage
//!
//! ```rust
//! use canastra::core::GameRng;
//! use canastra::mcts::{play_ai_turn, AiConfig};
//! use canastra::rules::Table;
//!
//! let mut table = Table::with_seed(7);
//! let mut rng = GameRng::new(7);
//! let action = play_ai_turn(&mut table, &AiConfig::default(), &mut rng);
//! assert!(action.is_some());
//! ```
//!
//! ## Custom Policies
//!
//! ```rust
//! use canastra::mcts::{IsMctsSearch, RandomRollout, SearchConfig};
//!
//! let search = IsMctsSearch::new(SearchConfig::advisory()).with_simulation(RandomRollout);
//! ```

pub mod agent;
pub mod config;
pub mod determinize;
pub mod heuristics;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;

pub use agent::{advise, advise_with, play_ai_turn, play_ai_turn_with, Advice};
pub use config::{AiConfig, SearchConfig};
pub use determinize::{determinize, unseen_cards};
pub use heuristics::{can_use_discard_top, discard_danger, early_triple_penalty, heuristic_score};
pub use node::Edge;
pub use policy::{evaluate, BiasedRollout, RandomRollout, Rollout, SelectionPolicy, SimulationPolicy, Ucb1};
pub use search::IsMctsSearch;
pub use stats::SearchStats;
