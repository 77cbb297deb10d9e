//! Fixed positions where one of the available moves is an obvious blunder.
//!
//! Each scenario puts human seat 0 to move and asks the advisory search for
//! a move. A scenario passes when the advice avoids the blunder, or when
//! there is no advice at all.

use tracing::info;

use crate::cards::{Card, Rank, Suit};
use crate::core::{Action, GameRng, Seat, TableConfig};
use crate::mcts::{advise_with, SearchConfig};
use crate::rules::{SetupError, Table, TableSetup, TurnPhase};

/// A hand-built position and the test its advice must pass.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub table: Table,
    /// Returns true when the advised action is acceptable.
    pub check: fn(&Table, &Action) -> bool,
}

/// Outcome of one scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub passed: bool,
    pub advice: Option<Action>,
}

fn config() -> TableConfig {
    TableConfig::all_bots().with_humans(&[Seat(0)])
}

fn discards(table: &Table, action: &Action, card: impl Fn(Card) -> bool) -> bool {
    match action {
        Action::Discard { hand_index } => table
            .current_player()
            .hand()
            .get(*hand_index)
            .is_some_and(|c| card(*c)),
        _ => false,
    }
}

/// The three standard blunder positions.
pub fn blunder_scenarios() -> Result<Vec<Scenario>, SetupError> {
    let joker_discard = TableSetup::new()
        .with_config(config())
        .with_hand(Seat(0), &[Card::JOKER, Card::new(Rank::Four, Suit::Spades)])
        .with_discard(&[Card::new(Rank::Five, Suit::Hearts)])
        .with_phase(TurnPhase::Discard)
        .with_seed(11)
        .build()?;

    let useful_pile = TableSetup::new()
        .with_config(config())
        .with_sequence(
            Seat(0),
            Suit::Hearts,
            &[
                Card::new(Rank::Three, Suit::Hearts),
                Card::new(Rank::Four, Suit::Hearts),
                Card::new(Rank::Five, Suit::Hearts),
                Card::new(Rank::Six, Suit::Hearts),
            ],
        )
        .with_hand(
            Seat(0),
            &[Card::new(Rank::Ten, Suit::Clubs), Card::new(Rank::Two, Suit::Diamonds)],
        )
        .with_discard(&[Card::new(Rank::Seven, Suit::Hearts)])
        .with_stock(&[Card::new(Rank::Ace, Suit::Spades)])
        .with_phase(TurnPhase::Draw)
        .with_seed(12)
        .build()?;

    let matching_rank = TableSetup::new()
        .with_config(config())
        .with_hand(
            Seat(0),
            &[Card::new(Rank::Four, Suit::Diamonds), Card::new(Rank::Seven, Suit::Hearts)],
        )
        .with_discard(&[Card::new(Rank::Four, Suit::Clubs)])
        .with_phase(TurnPhase::Discard)
        .with_seed(13)
        .build()?;

    Ok(vec![
        Scenario {
            name: "keep the joker",
            table: joker_discard,
            check: |table, action| !discards(table, action, Card::is_joker),
        },
        Scenario {
            name: "take a pile that extends a meld",
            table: useful_pile,
            check: |_, action| *action == Action::DrawDiscard,
        },
        Scenario {
            name: "do not feed the pile's rank",
            table: matching_rank,
            check: |table, action| !discards(table, action, |c| c.rank == Rank::Four),
        },
    ])
}

/// Ask for advice on every scenario.
pub fn run_blunder_scenarios(config: &SearchConfig, rng: &mut GameRng) -> Result<Vec<ScenarioReport>, SetupError> {
    let reports: Vec<ScenarioReport> = blunder_scenarios()?
        .into_iter()
        .map(|scenario| {
            let advice = advise_with(&scenario.table, config, rng).map(|a| a.action);
            let passed = advice
                .as_ref()
                .map_or(true, |action| (scenario.check)(&scenario.table, action));
            info!(scenario = scenario.name, passed, advice = ?advice, "blunder scenario");
            ScenarioReport {
                name: scenario.name,
                passed,
                advice,
            }
        })
        .collect();
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenarios_build() {
        let scenarios = blunder_scenarios().unwrap();
        assert_eq!(scenarios.len(), 3);
        for scenario in &scenarios {
            scenario.table.check_invariants().unwrap();
            assert!(scenario.table.current_player().is_human());
        }
        assert_eq!(scenarios[1].table.stock().len(), 1);
    }

    #[test]
    fn test_checks_judge_discards() {
        let scenarios = blunder_scenarios().unwrap();
        let joker = &scenarios[0];
        assert!(!(joker.check)(&joker.table, &Action::Discard { hand_index: 0 }));
        assert!((joker.check)(&joker.table, &Action::Discard { hand_index: 1 }));

        let pile = &scenarios[1];
        assert!(!(pile.check)(&pile.table, &Action::DrawStock));
        assert!((pile.check)(&pile.table, &Action::DrawDiscard));
    }

    #[test]
    fn test_penalties_alone_avoid_discard_blunders() {
        // No samples: the choice rests on the danger penalty only.
        let config = SearchConfig::advisory().with_rollouts(0);
        let reports = run_blunder_scenarios(&config, &mut GameRng::new(4)).unwrap();
        assert_eq!(reports.len(), 3);
        assert!(reports[0].passed);
        assert!(reports[2].passed);
    }
}
