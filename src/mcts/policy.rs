//! Search policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: which candidate action the next sample evaluates
//! - `SimulationPolicy`: how a determinized table is played forward

use crate::core::{Action, GameRng, Team};
use crate::rules::{abstract_actions, apply_action, Table};

use super::config::SearchConfig;
use super::heuristics::{can_use_discard_top, heuristic_score};
use super::node::Edge;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for choosing which edge the next sample evaluates.
pub trait SelectionPolicy: Send + Sync {
    /// Select an edge index. `total` is the number of samples drawn so far.
    fn select(&self, edges: &[Edge], total: u32, config: &SearchConfig) -> usize;
}

/// UCB1 selection.
///
/// Formula: mean(a) + c * sqrt(N + 1) / sqrt(n(a)); unvisited edges score
/// infinity. Ties go to the earliest edge.
#[derive(Clone, Debug, Default)]
pub struct Ucb1;

impl Ucb1 {
    /// UCB1 value of one edge.
    #[must_use]
    pub fn score(edge: &Edge, total: u32, c: f64) -> f64 {
        if edge.visits == 0 {
            return f64::INFINITY;
        }
        edge.mean() + c * (f64::from(total) + 1.0).sqrt() / f64::from(edge.visits).sqrt()
    }
}

impl SelectionPolicy for Ucb1 {
    fn select(&self, edges: &[Edge], total: u32, config: &SearchConfig) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, edge) in edges.iter().enumerate() {
            let score = Self::score(edge, total, config.exploration_constant);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        best
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Outcome of one rollout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rollout {
    /// Score from the searching team's point of view.
    pub score: f64,
    /// Actions played.
    pub steps: u32,
}

/// Policy for playing a determinized table forward.
pub trait SimulationPolicy: Send + Sync {
    /// Play from `table` for at most `config.max_rollout_depth` actions.
    ///
    /// Returns the team's recorded points if the game ended, otherwise the
    /// static heuristic.
    fn simulate(&self, table: &mut Table, team: Team, rng: &mut GameRng, config: &SearchConfig) -> Rollout;
}

/// Default rollout: abstracted actions chosen uniformly, except that a
/// seat which could extend one of its team's melds with the discard top
/// takes the pile with a fixed probability.
#[derive(Clone, Debug, Default)]
pub struct BiasedRollout;

impl BiasedRollout {
    fn choose(table: &Table, team: Team, actions: &[Action], rng: &mut GameRng, config: &SearchConfig) -> usize {
        if let Some(take) = actions.iter().position(|a| *a == Action::DrawDiscard) {
            let prob = if table.current_seat().team() == team {
                config.own_team_pickup_prob
            } else {
                config.opponent_pickup_prob
            };
            if can_use_discard_top(table) && rng.gen_bool(prob) {
                return take;
            }
        }
        rng.gen_range_usize(0..actions.len())
    }
}

impl SimulationPolicy for BiasedRollout {
    fn simulate(&self, table: &mut Table, team: Team, rng: &mut GameRng, config: &SearchConfig) -> Rollout {
        run_rollout(table, team, rng, config, Self::choose)
    }
}

/// Uniformly random rollout over abstracted actions.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl SimulationPolicy for RandomRollout {
    fn simulate(&self, table: &mut Table, team: Team, rng: &mut GameRng, config: &SearchConfig) -> Rollout {
        run_rollout(table, team, rng, config, |_, _, actions, rng, _| {
            rng.gen_range_usize(0..actions.len())
        })
    }
}

fn run_rollout(
    table: &mut Table,
    team: Team,
    rng: &mut GameRng,
    config: &SearchConfig,
    choose: impl Fn(&Table, Team, &[Action], &mut GameRng, &SearchConfig) -> usize,
) -> Rollout {
    let mut steps = 0;
    while steps < config.max_rollout_depth && !table.is_game_over() {
        let actions = abstract_actions(table, rng, config.rollout_caps);
        if actions.is_empty() {
            break;
        }
        let i = choose(table, team, &actions, rng, config);
        apply_action(table, &actions[i]);
        steps += 1;
    }
    Rollout {
        score: evaluate(table, team, config),
        steps,
    }
}

/// Recorded points once the game is over, the heuristic otherwise.
#[must_use]
pub fn evaluate(table: &Table, team: Team, config: &SearchConfig) -> f64 {
    if table.is_game_over() {
        f64::from(table.player(team.seats()[0]).points())
    } else {
        heuristic_score(table, team, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_hand, Suit};
    use crate::core::Seat;
    use crate::rules::{TableSetup, TurnPhase};

    #[test]
    fn test_ucb1_prefers_unvisited() {
        let mut visited = Edge::new(Action::DrawStock);
        visited.visits = 3;
        visited.record(100.0);
        let fresh = Edge::new(Action::DrawDiscard);

        let config = SearchConfig::default();
        assert_eq!(Ucb1.select(&[visited, fresh], 3, &config), 1);
    }

    #[test]
    fn test_ucb1_exploits_higher_mean() {
        let mut a = Edge::new(Action::DrawStock);
        a.visits = 4;
        a.record(10.0);
        let mut b = Edge::new(Action::DrawDiscard);
        b.visits = 4;
        b.record(80.0);

        let config = SearchConfig::default();
        assert_eq!(Ucb1.select(&[a.clone(), b.clone()], 8, &config), 1);
        let expected = 80.0 + 1.4 * 9.0_f64.sqrt() / 2.0;
        assert!((Ucb1::score(&b, 8, 1.4) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rollout_respects_depth() {
        let mut table = Table::with_seed(3);
        table.silence();
        let mut rng = GameRng::new(3);
        let config = SearchConfig::default().with_max_rollout_depth(5);
        let rollout = BiasedRollout.simulate(&mut table, Team(0), &mut rng, &config);
        assert!(rollout.steps <= 5);
        table.check_invariants().unwrap();
    }

    #[test]
    fn test_rollout_scores_finished_game() {
        let mut table = TableSetup::new().with_stock(&[]).with_phase(TurnPhase::Draw).build().unwrap();
        table.draw_from_stock().unwrap();
        assert!(table.is_game_over());

        let mut rng = GameRng::new(1);
        let config = SearchConfig::default();
        let rollout = RandomRollout.simulate(&mut table, Team(1), &mut rng, &config);
        assert_eq!(rollout.steps, 0);
        assert_eq!(rollout.score, f64::from(table.outcome().unwrap().score(Team(1))));
    }

    #[test]
    fn test_certain_pickup_bias() {
        let table = TableSetup::new()
            .with_sequence(Seat(0), Suit::Hearts, &parse_hand("3H 4H 5H 6H").unwrap())
            .with_discard(&parse_hand("7H").unwrap())
            .build()
            .unwrap();
        let actions = vec![Action::DrawStock, Action::DrawDiscard];
        let config = SearchConfig::default().with_pickup_probs(1.0, 1.0);
        let mut rng = GameRng::new(0);
        for _ in 0..20 {
            assert_eq!(BiasedRollout::choose(&table, Team(0), &actions, &mut rng, &config), 1);
        }
    }
}
