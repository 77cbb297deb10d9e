//! Meld validator scenarios through the public API.

use canastra::cards::{detect_meld_kind, organize_hand, parse_hand, Card, Meld, MeldError, MeldShape, Rank, Suit};
use canastra::core::{Action, Seat, Team};
use canastra::mcts::discard_danger;
use canastra::rules::{RuleError, TableSetup, TurnPhase};

fn cards(s: &str) -> Vec<Card> {
    parse_hand(s).unwrap()
}

fn card(s: &str) -> Card {
    s.parse().unwrap()
}

#[test]
fn test_two_fills_a_gap_then_blocks_wildcards() {
    let mut meld = Meld::sequence(Suit::Hearts, &cards("5H 2H 7H")).unwrap();

    meld.add_card(card("8H")).unwrap();
    assert_eq!(meld.add_card(card("8H")), Err(MeldError::DuplicateRank(Rank::Eight)));
    assert_eq!(meld.add_card(card("2C")), Err(MeldError::TooManyWildcards));
    assert_eq!(meld.len(), 4);
}

#[test]
fn test_wildcard_joins_run_with_stand_in_two() {
    let mut meld = Meld::sequence(Suit::Hearts, &cards("2H 4H 5H")).unwrap();
    assert!(Meld::sequence(Suit::Hearts, &cards("2H 4H 5H Joker")).is_ok());

    assert!(meld.can_add(Card::JOKER));
    meld.add_card(Card::JOKER).unwrap();
    assert_eq!(meld.wildcard_count(), 1);
    assert_eq!(meld.add_card(card("2S")), Err(MeldError::TooManyWildcards));
}

#[test]
fn test_invalid_run_restores_hand() {
    let hand = cards("AH 3H 5H 9C");
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &hand)
        .with_phase(TurnPhase::LayDown)
        .build()
        .unwrap();

    let err = table.lay_down_sequence(Suit::Hearts, &cards("AH 3H 5H")).unwrap_err();
    assert_eq!(err, RuleError::InvalidMeld(MeldError::NotARun));
    assert_eq!(err.to_string(), "invalid meld: cards do not form a run");
    assert_eq!(table.current_player().hand(), hand.as_slice());
}

#[test]
fn test_dirty_canastra_does_not_allow_going_out() {
    let dirty = cards("3S 4S Joker 6S 7S 8S 9S");
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("KD"))
        .with_sequence(Seat(0), Suit::Spades, &dirty)
        .with_received_reserve(Seat(1))
        .with_phase(TurnPhase::Discard)
        .build()
        .unwrap();
    assert!(table.team_has_dirty_canastra(Team(0)));

    assert_eq!(table.discard(card("KD")), Err(RuleError::CleanCanastraRequired));
    assert_eq!(table.current_player().hand(), cards("KD").as_slice());
    assert!(table.discard_pile().is_empty());

    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("KD"))
        .with_sequence(Seat(0), Suit::Spades, &dirty)
        .with_sequence(Seat(1), Suit::Hearts, &cards("5H 6H 7H 8H 9H 10H JH"))
        .with_received_reserve(Seat(1))
        .with_phase(TurnPhase::Discard)
        .build()
        .unwrap();
    table.discard(card("KD")).unwrap();
    assert!(table.is_game_over());
}

#[test]
fn test_joker_is_the_riskiest_discard() {
    let table = TableSetup::new()
        .with_hand(Seat(0), &cards("Joker 4S"))
        .with_discard(&cards("5H"))
        .with_phase(TurnPhase::Discard)
        .build()
        .unwrap();

    let joker = discard_danger(&table, &Action::Discard { hand_index: 0 });
    let four = discard_danger(&table, &Action::Discard { hand_index: 1 });
    assert!(joker > four);
}

#[test]
fn test_meld_shape_detection() {
    assert_eq!(detect_meld_kind(&cards("KS KH Joker")), MeldShape::Set);
    assert_eq!(detect_meld_kind(&cards("3C 3H 3S")), MeldShape::Set);
    assert!(matches!(detect_meld_kind(&cards("9D 10D JD")), MeldShape::Sequence(_)));
    assert_eq!(detect_meld_kind(&cards("9D 10C JD")), MeldShape::None);
}

#[test]
fn test_organized_hand_keeps_every_card() {
    let hand = cards("KS 4H Joker 2C AS 6H 5H");
    let organized = organize_hand(&hand);

    let mut a = hand.clone();
    let mut b = organized.clone();
    a.sort();
    b.sort();
    assert_eq!(a, b);
    assert_ne!(organized, hand);
}
