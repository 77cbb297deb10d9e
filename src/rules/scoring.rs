//! Final scoring and game results.
//!
//! ## Team score
//!
//! For each team: the value of every meld its seats laid down, minus the
//! value of every card still in their hands, plus 100 if either seat ended
//! with an empty hand, minus 100 if neither seat ever picked up the team's
//! reserve pile. Both seats of a team record the same total.

use serde::{Deserialize, Serialize};

use crate::cards::cards_value;
use crate::core::{Team, TeamMap};

use super::engine::Table;

/// Bonus for a team with a seat that finished with no cards.
pub const WENT_OUT_BONUS: i32 = 100;

/// Penalty for a team that never picked up its reserve pile.
pub const NO_RESERVE_PENALTY: i32 = 100;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// One team scored strictly more.
    Winner(Team),
    /// Equal totals.
    Draw,
}

impl GameResult {
    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, team: Team) -> bool {
        matches!(self, GameResult::Winner(t) if *t == team)
    }

    /// The winning team, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        match self {
            GameResult::Winner(t) => Some(*t),
            GameResult::Draw => None,
        }
    }
}

/// What ended the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A seat needed to draw and the stock was empty.
    StockExhausted,
    /// A seat went out a second time for its team.
    FinalKnock,
    /// Neither the stock nor the discard pile had anything left to draw.
    PilesExhausted,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::StockExhausted => f.write_str("stock exhausted"),
            EndReason::FinalKnock => f.write_str("final knock"),
            EndReason::PilesExhausted => f.write_str("no cards left to draw"),
        }
    }
}

/// Score components for one team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub meld_points: i32,
    pub hand_points: i32,
    pub went_out_bonus: i32,
    pub reserve_penalty: i32,
}

impl TeamScore {
    #[must_use]
    pub fn total(&self) -> i32 {
        self.meld_points - self.hand_points + self.went_out_bonus - self.reserve_penalty
    }
}

/// Score summary of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub breakdown: TeamMap<TeamScore>,
    pub result: GameResult,
    pub reason: EndReason,
}

impl ScoreSummary {
    /// Final total for a team.
    #[must_use]
    pub fn score(&self, team: Team) -> i32 {
        self.breakdown[team].total()
    }

    /// Winning team, or `None` on a tie.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        self.result.winner()
    }
}

/// Score one team in the table's current position.
#[must_use]
pub fn score_team(table: &Table, team: Team) -> TeamScore {
    let mut score = TeamScore::default();
    let mut went_out = false;
    let mut received = false;

    for seat in team.seats() {
        let player = table.player(seat);
        score.meld_points += player.meld_value();
        score.hand_points += cards_value(player.hand());
        went_out |= player.hand().is_empty();
        received |= player.has_received_reserve();
    }

    if went_out {
        score.went_out_bonus = WENT_OUT_BONUS;
    }
    if !received {
        score.reserve_penalty = NO_RESERVE_PENALTY;
    }
    score
}

/// Score both teams and decide the result.
#[must_use]
pub fn score_table(table: &Table, reason: EndReason) -> ScoreSummary {
    let breakdown = TeamMap::new(|team| score_team(table, team));
    let (a, b) = (breakdown[Team(0)].total(), breakdown[Team(1)].total());
    let result = match a.cmp(&b) {
        std::cmp::Ordering::Greater => GameResult::Winner(Team(0)),
        std::cmp::Ordering::Less => GameResult::Winner(Team(1)),
        std::cmp::Ordering::Equal => GameResult::Draw,
    };
    ScoreSummary {
        breakdown,
        result,
        reason,
    }
}
