//! Headless bot-vs-bot matches for measuring bot strength.
//!
//! ## Overview
//!
//! - `play_match`: one full game with a bot per team
//! - `win_rate_vs_random`: a search bot against a random mover
//! - `control_vs_challenger`: two search configurations head to head, each
//!   playing both teams for fairness
//! - `scenarios`: hand-built positions where one move is a clear blunder
//!
//! Matches run entirely in memory with message logging switched off. A
//! game that hits the turn cap counts as not completed and is left out of
//! the point totals.

pub mod scenarios;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{GameRng, TableConfig, Team, TeamMap};
use crate::mcts::{play_ai_turn_with, SearchConfig};
use crate::rules::{apply_action, legal_actions, ScoreSummary, Table};

pub use scenarios::{blunder_scenarios, run_blunder_scenarios, Scenario, ScenarioReport};

/// Who plays for a team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Bot {
    /// Uniformly random legal actions.
    Random,
    /// IS-MCTS with the given configuration.
    Search(SearchConfig),
}

impl Bot {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Bot::Random => "random".to_string(),
            Bot::Search(config) => format!("search({}x{})", config.rollouts, config.max_rollout_depth),
        }
    }

    /// Play the current seat's whole turn, at most `max_decisions` actions.
    /// Returns the number of actions applied.
    pub fn play_turn(&self, table: &mut Table, rng: &mut GameRng, max_decisions: u32) -> u32 {
        let seat = table.current_seat();
        let mut decisions = 0;

        while !table.is_game_over() && table.current_seat() == seat && decisions < max_decisions {
            let applied = match self {
                Bot::Random => {
                    let actions = legal_actions(table);
                    match rng.choose(&actions) {
                        Some(action) => apply_action(table, action),
                        None => {
                            table.end_if_exhausted();
                            false
                        }
                    }
                }
                Bot::Search(config) => play_ai_turn_with(table, config, rng).is_some(),
            };
            if !applied {
                break;
            }
            decisions += 1;
        }
        decisions
    }
}

/// Limits for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seat turns before the game is abandoned.
    pub max_turns: u32,

    /// Actions one seat may take in a single turn.
    pub max_decisions_per_turn: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_turns: 500,
            max_decisions_per_turn: 64,
        }
    }
}

impl MatchConfig {
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }
}

/// Result of one match.
#[derive(Clone, Debug)]
pub struct MatchResult {
    /// Final scores; `None` if the game did not finish.
    pub outcome: Option<ScoreSummary>,
    pub turns: u32,
    pub decisions: u32,
    pub elapsed: Duration,
}

impl MatchResult {
    #[must_use]
    pub fn completed(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        self.outcome.as_ref().and_then(ScoreSummary::winner)
    }

    /// Final score for a team (0 for an unfinished game).
    #[must_use]
    pub fn score(&self, team: Team) -> i32 {
        self.outcome.as_ref().map_or(0, |o| o.score(team))
    }
}

/// Play one game from a seeded deal.
pub fn play_match(bots: &TeamMap<Bot>, seed: u64, config: &MatchConfig) -> MatchResult {
    let start = Instant::now();
    let mut deal_rng = GameRng::new(seed);
    let mut table = Table::new(TableConfig::all_bots(), &mut deal_rng);
    table.silence();
    let mut rng = deal_rng.fork();

    let mut turns = 0;
    let mut decisions = 0;
    while !table.is_game_over() && turns < config.max_turns {
        let seat = table.current_seat();
        decisions += bots[seat.team()].play_turn(&mut table, &mut rng, config.max_decisions_per_turn);
        if !table.is_game_over() && table.current_seat() == seat {
            debug!(seed, turn = turns, seat = seat.index(), "turn did not finish; abandoning game");
            break;
        }
        turns += 1;
    }

    MatchResult {
        outcome: table.outcome().cloned(),
        turns,
        decisions,
        elapsed: start.elapsed(),
    }
}

// =============================================================================
// Bot vs random
// =============================================================================

/// Summary of a search bot against random play.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VsRandomReport {
    pub games: u32,
    pub completed: u32,
    pub wins: u32,
    pub ties: u32,
    /// Sum over games of (bot team score - random team score).
    pub total_point_diff: i64,
}

impl VsRandomReport {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games)
        }
    }

    #[must_use]
    pub fn avg_point_diff(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_point_diff as f64 / f64::from(self.games)
        }
    }
}

/// Play `games` games with the search bot on `bot_team`, seeds
/// `seed_base..seed_base + games`.
pub fn win_rate_vs_random(
    search: &SearchConfig,
    games: u32,
    bot_team: Team,
    seed_base: u64,
    config: &MatchConfig,
) -> VsRandomReport {
    let bots = TeamMap::new(|team| {
        if team == bot_team {
            Bot::Search(search.clone())
        } else {
            Bot::Random
        }
    });

    let mut report = VsRandomReport {
        games,
        ..Default::default()
    };
    for i in 0..games {
        let result = play_match(&bots, seed_base + u64::from(i), config);
        if !result.completed() {
            continue;
        }
        report.completed += 1;
        match result.winner() {
            Some(team) if team == bot_team => report.wins += 1,
            Some(_) => {}
            None => report.ties += 1,
        }
        report.total_point_diff += i64::from(result.score(bot_team) - result.score(bot_team.other()));
    }

    info!(
        games,
        wins = report.wins,
        win_rate = report.win_rate(),
        avg_point_diff = report.avg_point_diff(),
        "bot vs random finished"
    );
    report
}

// =============================================================================
// Control vs challenger
// =============================================================================

/// Head-to-head summary, from the two configurations' point of view.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HeadToHeadReport {
    pub games_requested: u32,
    pub games_played: u32,
    pub control_wins: u32,
    pub challenger_wins: u32,
    pub ties: u32,
    pub control_points: i64,
    pub challenger_points: i64,
}

impl HeadToHeadReport {
    /// Mean of (challenger - control) over completed games. Positive means
    /// the challenger scores more.
    #[must_use]
    pub fn avg_point_diff(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            (self.challenger_points - self.control_points) as f64 / f64::from(self.games_played)
        }
    }

    /// Did the challenger win more games or score more points?
    #[must_use]
    pub fn challenger_is_better(&self) -> bool {
        self.challenger_wins > self.control_wins || self.challenger_points > self.control_points
    }
}

/// Seed offset for the games where the configurations swap teams.
const SWAPPED_SEED_OFFSET: u64 = 1000;

/// Play `games_per_side` games with control as team 1 and as many with the
/// teams swapped.
pub fn control_vs_challenger(
    control: &SearchConfig,
    challenger: &SearchConfig,
    games_per_side: u32,
    seed_base: u64,
    config: &MatchConfig,
) -> HeadToHeadReport {
    let mut report = HeadToHeadReport {
        games_requested: 2 * games_per_side,
        ..Default::default()
    };

    for (control_team, offset) in [(Team(0), 0), (Team(1), SWAPPED_SEED_OFFSET)] {
        let bots = TeamMap::new(|team| {
            if team == control_team {
                Bot::Search(control.clone())
            } else {
                Bot::Search(challenger.clone())
            }
        });

        for i in 0..games_per_side {
            let result = play_match(&bots, seed_base + offset + u64::from(i), config);
            if !result.completed() {
                continue;
            }
            report.games_played += 1;
            report.control_points += i64::from(result.score(control_team));
            report.challenger_points += i64::from(result.score(control_team.other()));
            match result.winner() {
                None => report.ties += 1,
                Some(team) if team == control_team => report.control_wins += 1,
                Some(_) => report.challenger_wins += 1,
            }
        }
    }

    info!(
        played = report.games_played,
        control_wins = report.control_wins,
        challenger_wins = report.challenger_wins,
        ties = report.ties,
        avg_point_diff = report.avg_point_diff(),
        "control vs challenger finished"
    );
    report
}

/// The stronger candidate configuration benchmarked against the in-game
/// default.
#[must_use]
pub fn default_challenger() -> SearchConfig {
    SearchConfig::in_game()
        .with_rollouts(10)
        .with_max_rollout_depth(6)
        .with_discourage_early_triple(true)
}
