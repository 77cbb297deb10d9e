//! Information-set Monte Carlo search.
//!
//! Every sample redeals the cards the acting seat cannot see, applies one
//! candidate action to that determinization and plays a short rollout.
//! Candidates are chosen round-robin until each has been tried once, then
//! by the selection policy. The final choice is the best sampled mean after
//! subtracting the risk penalties, which are judged on the real table.

use std::time::Instant;

use tracing::{debug, trace};

use crate::core::{Action, GameRng};
use crate::rules::{abstract_actions, apply_action, legal_actions, Table};

use super::config::SearchConfig;
use super::determinize::determinize;
use super::heuristics::{discard_danger, early_triple_penalty};
use super::node::Edge;
use super::policy::{BiasedRollout, SelectionPolicy, SimulationPolicy, Ucb1};
use super::stats::SearchStats;

/// Main search context.
///
/// Owns the configuration, the RNG and the policies; holds the per-action
/// statistics of the most recent decision for inspection.
pub struct IsMctsSearch {
    /// Search configuration.
    config: SearchConfig,

    /// RNG for determinization, abstraction and rollouts.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy>,

    /// Candidate actions of the last decision.
    edges: Vec<Edge>,

    /// Search statistics.
    stats: SearchStats,
}

impl IsMctsSearch {
    /// Create a search context. The RNG is seeded from `config.seed`, or
    /// from entropy when unset.
    pub fn new(config: SearchConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self {
            config,
            rng,
            selection: Box::new(Ucb1),
            simulation: Box::new(BiasedRollout),
            edges: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Replace the RNG.
    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<S: SimulationPolicy + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Statistics of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Candidate actions and their statistics from the last search. Empty
    /// when the search returned without sampling.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Choose an action for the seat to move. The table is not modified.
    ///
    /// Returns `None` when there is nothing to do (the game is over, or the
    /// seat must draw and both piles are empty).
    pub fn search(&mut self, table: &Table) -> Option<Action> {
        let start = Instant::now();
        self.stats.reset();
        self.edges.clear();

        if table.is_game_over() {
            return None;
        }

        let seat = table.current_seat();
        let team = seat.team();
        let mut actions = if self.config.use_abstraction {
            abstract_actions(table, &mut self.rng, self.config.root_caps)
        } else {
            legal_actions(table)
        };

        match actions.len() {
            0 => return None,
            1 => return actions.pop(),
            _ => {}
        }

        self.edges = actions.into_iter().map(Edge::new).collect();
        self.stats.candidates = self.edges.len() as u32;

        for total in 0..self.config.rollouts {
            let index = if (total as usize) < self.edges.len() {
                total as usize
            } else {
                self.selection.select(&self.edges, total, &self.config)
            };
            self.stats.iterations += 1;
            self.edges[index].visits += 1;

            let mut sample = determinize(table, seat, &mut self.rng);
            if !apply_action(&mut sample, &self.edges[index].action) {
                self.stats.failed_samples += 1;
                trace!(action = %self.edges[index].action, "sample rejected action");
                continue;
            }

            let rollout = self
                .simulation
                .simulate(&mut sample, team, &mut self.rng, &self.config);
            self.stats.simulations += 1;
            self.stats.rollout_steps += u64::from(rollout.steps);
            self.edges[index].record(rollout.score);
            trace!(action = %self.edges[index].action, score = rollout.score, steps = rollout.steps, "sample");
        }

        let best = self.best_index(table);
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let edge = &self.edges[best];
        debug!(
            seat = seat.index(),
            action = %edge.action,
            mean = edge.mean(),
            candidates = self.stats.candidates,
            samples = self.stats.simulations,
            time_us = self.stats.time_us,
            "search decision"
        );
        Some(edge.action.clone())
    }

    /// Sampled mean minus the risk penalties for one candidate.
    #[must_use]
    pub fn adjusted_mean(&self, table: &Table, edge: &Edge) -> f64 {
        let mut penalty = self.config.discard_danger_weight * discard_danger(table, &edge.action);
        if self.config.discourage_early_triple {
            penalty += early_triple_penalty(table, &edge.action);
        }
        edge.mean() - penalty
    }

    fn best_index(&self, table: &Table) -> usize {
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, edge) in self.edges.iter().enumerate() {
            let value = self.adjusted_mean(table, edge);
            if value > best_value {
                best = i;
                best_value = value;
            }
        }
        best
    }
}
