//! Counters for one search decision.

use serde::{Deserialize, Serialize};

/// What one call to [`IsMctsSearch::search`](super::IsMctsSearch::search) did.
///
/// Reset at the start of every decision.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Root actions the search chose between.
    pub candidates: u32,

    /// Determinizations drawn.
    pub iterations: u32,

    /// Rollouts that ran to completion or depth.
    pub simulations: u32,

    /// Determinizations where the candidate did not apply.
    pub failed_samples: u32,

    pub rollout_steps: u64,

    /// Wall time in microseconds.
    pub time_us: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn rate(count: u64, time_us: u64) -> f64 {
        if time_us == 0 {
            return 0.0;
        }
        count as f64 * 1_000_000.0 / time_us as f64
    }

    #[must_use]
    pub fn samples_per_second(&self) -> f64 {
        Self::rate(u64::from(self.iterations), self.time_us)
    }

    /// Fraction of determinizations that could not take the candidate.
    ///
    /// High values mean the observer's view disagrees often with sampled
    /// worlds, e.g. a meld addition that relies on a hidden card.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        match self.iterations {
            0 => 0.0,
            n => f64::from(self.failed_samples) / f64::from(n),
        }
    }

    #[must_use]
    pub fn avg_rollout_steps(&self) -> f64 {
        match self.simulations {
            0 => 0.0,
            n => self.rollout_steps as f64 / f64::from(n),
        }
    }
}
