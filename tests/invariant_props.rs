//! Property tests for card conservation and atomic rule checks.
//!
//! Random legal play from random deals must keep all 108 cards accounted
//! for, every meld valid and every rejected action a no-op.

use canastra::cards::{Card, Rank, Suit};
use canastra::core::{Action, GameRng, Seat, TableConfig, Team};
use canastra::mcts::determinize;
use canastra::rules::{apply_action, legal_actions, Table, TurnPhase};
use proptest::prelude::*;

/// Play up to `steps` random legal actions, checking invariants after each.
fn random_play(table: &mut Table, rng: &mut GameRng, steps: usize) -> Result<(), TestCaseError> {
    for _ in 0..steps {
        if table.is_game_over() {
            break;
        }
        let actions = legal_actions(table);
        let Some(action) = rng.choose(&actions).cloned() else {
            table.end_if_exhausted();
            break;
        };
        prop_assert!(apply_action(table, &action), "legal action {} did not apply", action);
        prop_assert!(table.check_invariants().is_ok(), "{:?}", table.check_invariants());
    }
    Ok(())
}

/// A spread of actions across every phase, most of them illegal at any
/// given moment.
fn probe_actions() -> Vec<Action> {
    let five = Card::new(Rank::Five, Suit::Hearts);
    vec![
        Action::DrawStock,
        Action::DrawDiscard,
        Action::EndLayDown,
        Action::Discard { hand_index: 0 },
        Action::Discard { hand_index: 40 },
        Action::lay_down_set(&[five, five, Card::JOKER]),
        Action::lay_down_sequence(
            Suit::Hearts,
            &[five, Card::new(Rank::Six, Suit::Hearts), Card::new(Rank::Seven, Suit::Hearts)],
        ),
        Action::AddToMeld {
            owner: Seat(0),
            meld: 0,
            card: Card::JOKER,
        },
        Action::AddToMeld {
            owner: Seat(2),
            meld: 0,
            card: five,
        },
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: legal play conserves the deck and keeps melds valid
    #[test]
    fn prop_random_play_conserves_cards(seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        let mut table = Table::new(TableConfig::all_bots(), &mut rng);
        prop_assert!(table.check_invariants().is_ok());
        random_play(&mut table, &mut rng, 400)?;
    }

    /// Property: a rejected action leaves the table byte-for-byte unchanged
    #[test]
    fn prop_rejected_actions_change_nothing(seed in any::<u64>(), steps in 0usize..120) {
        let mut rng = GameRng::new(seed);
        let mut table = Table::new(TableConfig::all_bots(), &mut rng);
        random_play(&mut table, &mut rng, steps)?;

        let before = bincode::serialize(&table).unwrap();
        for action in probe_actions() {
            let mut trial = table.clone();
            if !apply_action(&mut trial, &action) {
                prop_assert_eq!(&bincode::serialize(&trial).unwrap(), &before,
                    "rejected {} modified the table", action);
            }
        }
    }

    /// Property: only the current phase's actions are accepted
    #[test]
    fn prop_phase_discipline(seed in any::<u64>(), steps in 0usize..80) {
        let mut rng = GameRng::new(seed);
        let mut table = Table::new(TableConfig::all_bots(), &mut rng);
        random_play(&mut table, &mut rng, steps)?;

        let phase = table.phase();
        let mut trial = table.clone();
        match phase {
            TurnPhase::Draw => {
                prop_assert!(!apply_action(&mut trial, &Action::EndLayDown));
                let discard0 = Action::Discard { hand_index: 0 };
                prop_assert!(!apply_action(&mut trial, &discard0));
            }
            TurnPhase::LayDown => {
                prop_assert!(!apply_action(&mut trial, &Action::DrawStock));
                let discard0 = Action::Discard { hand_index: 0 };
                prop_assert!(!apply_action(&mut trial, &discard0));
            }
            TurnPhase::Discard => {
                prop_assert!(!apply_action(&mut trial, &Action::DrawStock));
                prop_assert!(!apply_action(&mut trial, &Action::EndLayDown));
            }
            TurnPhase::Ended => {
                prop_assert!(legal_actions(&table).is_empty());
            }
        }
        prop_assert_eq!(trial, table);
    }

    /// Property: a determinization keeps what the observer knows and every
    /// pile size
    #[test]
    fn prop_determinize_preserves_knowledge(seed in any::<u64>(), steps in 0usize..120, observer in 0u8..4) {
        let mut rng = GameRng::new(seed);
        let mut table = Table::new(TableConfig::all_bots(), &mut rng);
        random_play(&mut table, &mut rng, steps)?;

        let observer = Seat(observer);
        let sample = determinize(&table, observer, &mut rng);
        prop_assert!(sample.check_invariants().is_ok());
        prop_assert_eq!(sample.player(observer).hand(), table.player(observer).hand());
        prop_assert_eq!(
            sample.player(observer.partner()).hand(),
            table.player(observer.partner()).hand()
        );
        prop_assert_eq!(sample.discard_pile(), table.discard_pile());
        prop_assert_eq!(sample.stock().len(), table.stock().len());
        for seat in Seat::all() {
            prop_assert_eq!(sample.player(seat).hand().len(), table.player(seat).hand().len());
            prop_assert_eq!(sample.player(seat).melds(), table.player(seat).melds());
        }
        for team in Team::all() {
            prop_assert_eq!(sample.reserve(team).len(), table.reserve(team).len());
        }
    }
}
