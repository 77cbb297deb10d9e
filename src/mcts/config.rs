//! Search configuration parameters.

use serde::{Deserialize, Serialize};

use crate::rules::AbstractionCaps;

/// IS-MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Total sampled evaluations per decision.
    pub rollouts: u32,

    /// Actions played in each rollout before falling back to the heuristic.
    pub max_rollout_depth: u32,

    /// Search over abstracted actions (true) or every legal action.
    pub use_abstraction: bool,

    /// Caps for the actions being searched.
    pub root_caps: AbstractionCaps,

    /// Caps inside rollouts.
    pub rollout_caps: AbstractionCaps,

    /// Chance that the searching team takes a discard pile it can use.
    pub own_team_pickup_prob: f64,

    /// Chance that an opponent takes a discard pile it can use.
    pub opponent_pickup_prob: f64,

    /// UCB1 exploration constant.
    pub exploration_constant: f64,

    /// Score units subtracted per unit of discard danger.
    pub discard_danger_weight: f64,

    /// Penalize laying down sets while the stock is still large.
    pub discourage_early_triple: bool,

    /// Heuristic bonus for a team holding a clean canastra.
    pub clean_canastra_bonus: f64,

    /// Heuristic bonus for a team holding a dirty canastra.
    pub dirty_canastra_bonus: f64,

    /// Seed for the search RNG. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::in_game()
    }
}

impl SearchConfig {
    /// Small budget for routine bot turns.
    #[must_use]
    pub fn in_game() -> Self {
        Self {
            rollouts: 4,
            max_rollout_depth: 5,
            use_abstraction: true,
            root_caps: AbstractionCaps::ROOT,
            rollout_caps: AbstractionCaps::ROLLOUT,
            own_team_pickup_prob: 0.6,
            opponent_pickup_prob: 0.6,
            exploration_constant: 1.4,
            discard_danger_weight: 50.0,
            discourage_early_triple: false,
            clean_canastra_bonus: 30.0,
            dirty_canastra_bonus: 15.0,
            seed: None,
        }
    }

    /// Larger budget over every legal action, for advising a human seat.
    #[must_use]
    pub fn advisory() -> Self {
        Self {
            rollouts: 48,
            max_rollout_depth: 20,
            use_abstraction: false,
            ..Self::in_game()
        }
    }

    pub fn with_rollouts(mut self, rollouts: u32) -> Self {
        self.rollouts = rollouts;
        self
    }

    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    pub fn with_abstraction(mut self, enabled: bool) -> Self {
        self.use_abstraction = enabled;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_pickup_probs(mut self, own_team: f64, opponent: f64) -> Self {
        self.own_team_pickup_prob = own_team;
        self.opponent_pickup_prob = opponent;
        self
    }

    pub fn with_discard_danger_weight(mut self, weight: f64) -> Self {
        self.discard_danger_weight = weight;
        self
    }

    pub fn with_discourage_early_triple(mut self, enabled: bool) -> Self {
        self.discourage_early_triple = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// The knobs a caller sets for a bot turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub rollouts: u32,
    pub max_rollout_depth: u32,
    pub discourage_early_triple: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            rollouts: 4,
            max_rollout_depth: 5,
            discourage_early_triple: false,
        }
    }
}

impl From<AiConfig> for SearchConfig {
    fn from(ai: AiConfig) -> Self {
        SearchConfig::in_game()
            .with_rollouts(ai.rollouts)
            .with_max_rollout_depth(ai.max_rollout_depth)
            .with_discourage_early_triple(ai.discourage_early_triple)
    }
}
