//! Core types: seats and teams, actions, RNG, table configuration.

pub mod action;
pub mod config;
pub mod player;
pub mod rng;

pub use action::{Action, ActionCards};
pub use config::TableConfig;
pub use player::{Seat, SeatMap, Team, TeamMap, SEAT_COUNT, TEAM_COUNT};
pub use rng::GameRng;
