//! Game rules: the table state machine, scoring and the action model.
//!
//! `Table` owns all game state and is the only thing that mutates hands,
//! melds and piles. Callers either invoke its operations directly or go
//! through `Action` values with `apply_action`, which is what the search
//! does.

pub mod engine;
pub mod error;
pub mod legal;
pub mod scoring;
pub mod setup;

pub use engine::{EmptiedBy, KnockKind, PlayerState, Table, TurnPhase};
pub use error::{InvariantError, RuleError};
pub use legal::{abstract_actions, apply_action, find_meld_in_hand, legal_actions, AbstractionCaps};
pub use scoring::{
    score_table, score_team, EndReason, GameResult, ScoreSummary, TeamScore, NO_RESERVE_PENALTY,
    WENT_OUT_BONUS,
};
pub use setup::{SetupError, TableSetup};
