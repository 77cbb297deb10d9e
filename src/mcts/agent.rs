//! Bot entry points: play a decision, or advise a human seat.

use tracing::warn;

use crate::core::{Action, GameRng};
use crate::rules::{apply_action, legal_actions, Table};

use super::config::{AiConfig, SearchConfig};
use super::search::IsMctsSearch;

/// A suggested action with a short description for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advice {
    pub action: Action,
    pub description: String,
}

/// Search and apply one decision for the seat to move.
///
/// A bot turn is a series of these calls (draw, lay-down steps, discard).
/// Returns the action applied, or `None` when nothing was applied; in that
/// case the game is ended if the seat must draw and both piles are empty.
pub fn play_ai_turn(table: &mut Table, config: &AiConfig, rng: &mut GameRng) -> Option<Action> {
    play_ai_turn_with(table, &SearchConfig::from(*config), rng)
}

/// `play_ai_turn` with full control over the search.
pub fn play_ai_turn_with(table: &mut Table, config: &SearchConfig, rng: &mut GameRng) -> Option<Action> {
    let mut search = IsMctsSearch::new(config.clone()).with_rng(rng.fork());

    if let Some(action) = search.search(table) {
        if apply_action(table, &action) {
            return Some(action);
        }
        warn!(%action, seat = table.current_seat().index(), "chosen action did not apply; falling back");
        if let Some(fallback) = legal_actions(table)
            .into_iter()
            .find(|a| apply_action(table, a))
        {
            return Some(fallback);
        }
    }

    table.end_if_exhausted();
    None
}

/// What the bot would play for the human seat to move, using the advisory
/// budget. `None` when the game is over or a bot is to move.
#[must_use]
pub fn advise(table: &Table) -> Option<Advice> {
    advise_with(table, &SearchConfig::advisory(), &mut GameRng::from_entropy())
}

/// `advise` with an explicit configuration and RNG.
#[must_use]
pub fn advise_with(table: &Table, config: &SearchConfig, rng: &mut GameRng) -> Option<Advice> {
    if table.is_game_over() || !table.current_player().is_human() {
        return None;
    }
    let mut search = IsMctsSearch::new(config.clone()).with_rng(rng.fork());
    let action = search.search(table)?;
    Some(Advice {
        description: action.describe(table),
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Seat, TableConfig};
    use crate::rules::{TableSetup, TurnPhase};

    #[test]
    fn test_play_ai_turn_applies_one_action() {
        let mut table = Table::with_seed(31);
        let mut rng = GameRng::new(31);
        let action = play_ai_turn(&mut table, &AiConfig::default(), &mut rng);
        assert_eq!(action, Some(Action::DrawStock));
        assert_eq!(table.phase(), TurnPhase::LayDown);
    }

    #[test]
    fn test_exhausted_piles_end_the_game() {
        let mut table = TableSetup::new().with_stock(&[]).build().unwrap();
        let mut rng = GameRng::new(1);
        assert_eq!(play_ai_turn(&mut table, &AiConfig::default(), &mut rng), None);
        assert!(table.is_game_over());
    }

    #[test]
    fn test_advice_only_for_humans() {
        let table = TableSetup::new()
            .with_config(TableConfig::default())
            .with_current(Seat(1))
            .build()
            .unwrap();
        let mut rng = GameRng::new(2);
        let config = SearchConfig::advisory().with_rollouts(8);
        assert_eq!(advise_with(&table, &config, &mut rng), None);

        let table = TableSetup::new().with_current(Seat(0)).build().unwrap();
        let advice = advise_with(&table, &config, &mut rng).unwrap();
        assert_eq!(advice.action, Action::DrawStock);
        assert_eq!(advice.description, "Draw from the stock");
    }
}
