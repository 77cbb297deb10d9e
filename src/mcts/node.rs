//! Per-action statistics at the decision point.
//!
//! Each sample evaluates a fresh determinization, so no tree is kept below
//! the root: the search is a bandit over the root's actions.

use serde::{Deserialize, Serialize};

use crate::core::Action;

/// One candidate action and its sampled scores.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    /// The action this edge represents.
    pub action: Action,

    /// Times this action was selected.
    pub visits: u32,

    /// Samples where the action applied and a rollout produced a score.
    pub samples: u32,

    /// Sum of rollout scores.
    pub total_score: f64,
}

impl Edge {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            visits: 0,
            samples: 0,
            total_score: 0.0,
        }
    }

    /// Record one rollout result.
    pub fn record(&mut self, score: f64) {
        self.samples += 1;
        self.total_score += score;
    }

    /// Mean rollout score (0 before any sample).
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.total_score / f64::from(self.samples.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_mean() {
        let mut edge = Edge::new(Action::DrawStock);
        assert_eq!(edge.mean(), 0.0);

        edge.record(30.0);
        edge.record(-10.0);
        assert_eq!(edge.samples, 2);
        assert_eq!(edge.mean(), 10.0);
    }
}
