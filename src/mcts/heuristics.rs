//! Static evaluation and risk terms used by the search.
//!
//! `heuristic_score` values a position that a rollout stopped short of
//! the end. `discard_danger` and `early_triple_penalty` are judged once,
//! against the real table, and subtracted from an action's sampled mean.

use crate::cards::Rank;
use crate::core::{Action, Team};
use crate::rules::{Table, TurnPhase};

use super::config::SearchConfig;

/// Early-game penalty for a set that uses a wildcard.
pub const EARLY_WILD_SET_PENALTY: f64 = 50.0;

/// Early-game penalty for a set of naturals only.
pub const EARLY_NATURAL_SET_PENALTY: f64 = 25.0;

/// Team meld value minus team hand value, plus flat bonuses for holding a
/// clean and/or a dirty canastra.
#[must_use]
pub fn heuristic_score(table: &Table, team: Team, config: &SearchConfig) -> f64 {
    let mut score = f64::from(table.team_live_points(team));
    if table.team_has_clean_canastra(team) {
        score += config.clean_canastra_bonus;
    }
    if table.team_has_dirty_canastra(team) {
        score += config.dirty_canastra_bonus;
    }
    score
}

/// How bad a discard is, from 0 (harmless) to 1 (a joker).
///
/// - 1.0 for a joker
/// - 0.9 for a card the team could add to one of its own melds
/// - 0.5 for a card matching the pile top's rank (or a two on a joker),
///   which makes the pile easy to take
///
/// Conditions combine with `max`. Non-discard actions score 0.
#[must_use]
pub fn discard_danger(table: &Table, action: &Action) -> f64 {
    let Action::Discard { hand_index } = action else {
        return 0.0;
    };
    let seat = table.current_seat();
    let Some(&card) = table.player(seat).hand().get(*hand_index) else {
        return 0.0;
    };

    let mut danger: f64 = 0.0;
    if table.team_melds(seat.team()).any(|(_, _, m)| m.can_add(card)) {
        danger = danger.max(0.9);
    }
    if card.is_joker() {
        danger = 1.0;
    } else if let Some(top) = table.discard_top() {
        if top.rank == card.rank || (top.is_joker() && card.rank == Rank::Two) {
            danger = danger.max(0.5);
        }
    }
    danger
}

/// Penalty for laying down a set while the game is young.
#[must_use]
pub fn early_triple_penalty(table: &Table, action: &Action) -> f64 {
    let Action::LayDownSet { cards } = action else {
        return 0.0;
    };
    if !table.is_early_game() {
        return 0.0;
    }
    if cards.iter().any(|c| c.is_wildcard()) {
        EARLY_WILD_SET_PENALTY
    } else {
        EARLY_NATURAL_SET_PENALTY
    }
}

/// Could the seat to move extend one of its team's melds with the card on
/// top of the discard pile?
#[must_use]
pub fn can_use_discard_top(table: &Table) -> bool {
    if table.phase() != TurnPhase::Draw {
        return false;
    }
    let Some(top) = table.discard_top() else {
        return false;
    };
    table
        .team_melds(table.current_seat().team())
        .any(|(_, _, m)| m.can_add(top))
}
