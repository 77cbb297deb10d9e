//! Turn flow, knocking and end-of-game integration tests.

use canastra::cards::{parse_hand, Card, Rank, Suit};
use canastra::core::{Seat, Team};
use canastra::rules::{EndReason, KnockKind, RuleError, Table, TableSetup, TurnPhase};

fn cards(s: &str) -> Vec<Card> {
    parse_hand(s).unwrap()
}

/// Draw from the stock, skip laying down and discard the first card.
fn pass_turn(table: &mut Table) {
    table.draw_from_stock().unwrap();
    table.end_lay_down_phase().unwrap();
    let card = table.current_player().hand()[0];
    table.discard(card).unwrap();
}

// =============================================================================
// Phase discipline
// =============================================================================

#[test]
fn test_actions_outside_their_phase_are_rejected() {
    let mut table = TableSetup::new().with_seed(3).build().unwrap();
    let before = table.clone();
    let card = table.current_player().hand()[0];

    assert!(matches!(table.discard(card), Err(RuleError::WrongPhase { .. })));
    assert!(matches!(table.end_lay_down_phase(), Err(RuleError::WrongPhase { .. })));
    assert!(matches!(
        table.lay_down_set(&cards("AS AD AH")),
        Err(RuleError::WrongPhase { .. })
    ));
    assert_eq!(table, before);
}

#[test]
fn test_empty_discard_pile_cannot_be_taken() {
    let mut table = TableSetup::new().build().unwrap();
    assert_eq!(table.draw_from_discard(), Err(RuleError::EmptyDiscardPile));
    assert_eq!(table.phase(), TurnPhase::Draw);
}

#[test]
fn test_turn_passes_in_seat_order() {
    let mut table = TableSetup::new().with_current(Seat(2)).with_seed(9).build().unwrap();
    let turn = table.turn_number();

    pass_turn(&mut table);
    assert_eq!(table.current_seat(), Seat(3));
    pass_turn(&mut table);
    assert_eq!(table.current_seat(), Seat(0));
    assert_eq!(table.turn_number(), turn + 2);
    assert_eq!(table.discard_pile().len(), 2);
    table.check_invariants().unwrap();
}

#[test]
fn test_game_over_rejects_everything() {
    let mut table = TableSetup::new().with_stock(&[]).build().unwrap();
    table.draw_from_stock().unwrap();
    assert!(table.is_game_over());
    assert_eq!(table.draw_from_stock(), Err(RuleError::GameOver));
    assert_eq!(table.end_lay_down_phase(), Err(RuleError::GameOver));
}

// =============================================================================
// Melds
// =============================================================================

#[test]
fn test_invalid_lay_down_leaves_table_untouched() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("5H 6H 7C 9S"))
        .with_phase(TurnPhase::LayDown)
        .build()
        .unwrap();
    let before = table.clone();

    assert!(matches!(
        table.lay_down_sequence(Suit::Hearts, &cards("5H 6H 7C")),
        Err(RuleError::InvalidMeld(_))
    ));
    assert_eq!(
        table.lay_down_set(&cards("KD KD KD")),
        Err(RuleError::CardNotInHand(Card::new(Rank::King, Suit::Diamonds)))
    );
    assert_eq!(table, before);
}

#[test]
fn test_add_to_partner_meld() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("6H 9C KD"))
        .with_sequence(Seat(1), Suit::Hearts, &cards("3H 4H 5H"))
        .with_sequence(Seat(2), Suit::Spades, &cards("3S 4S 5S"))
        .with_phase(TurnPhase::LayDown)
        .build()
        .unwrap();

    table.add_to_meld(0, cards("6H")[0], Some(Seat(1))).unwrap();
    assert_eq!(table.player(Seat(1)).melds()[0].len(), 4);
    assert_eq!(table.current_player().hand().len(), 2);

    assert_eq!(
        table.add_to_meld(0, cards("KD")[0], Some(Seat(2))),
        Err(RuleError::OpponentMeld { owner: Seat(2) })
    );
    assert_eq!(
        table.add_to_meld(3, cards("KD")[0], None),
        Err(RuleError::NoSuchMeld { owner: Seat(0), index: 3 })
    );
}

#[test]
fn test_rejected_addition_keeps_hand_order() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("9C 8H KD"))
        .with_sequence(Seat(0), Suit::Hearts, &cards("3H 4H 5H"))
        .with_phase(TurnPhase::LayDown)
        .build()
        .unwrap();
    let before = table.clone();

    assert!(table.add_to_meld(0, cards("8H")[0], None).is_err());
    assert_eq!(table, before);
}

// =============================================================================
// Knocking
// =============================================================================

#[test]
fn test_direct_knock_picks_up_reserve() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("5H 6H 7H"))
        .with_phase(TurnPhase::LayDown)
        .build()
        .unwrap();

    table.lay_down_sequence(Suit::Hearts, &cards("5H 6H 7H")).unwrap();

    assert_eq!(table.last_knock(), Some((Seat(0), KnockKind::Direct)));
    assert_eq!(table.current_player().hand().len(), 11);
    assert!(table.current_player().has_received_reserve());
    assert!(table.reserve(Team(0)).is_empty());
    assert_eq!(table.current_seat(), Seat(0));
    assert_eq!(table.phase(), TurnPhase::LayDown);
    table.check_invariants().unwrap();
}

#[test]
fn test_indirect_knock_waits_for_next_turn() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("9C"))
        .with_phase(TurnPhase::Discard)
        .with_seed(5)
        .build()
        .unwrap();

    table.discard(cards("9C")[0]).unwrap();
    assert_eq!(table.last_knock(), Some((Seat(0), KnockKind::Indirect)));
    assert_eq!(table.pending_reserve(), Some(Seat(0)));
    assert!(table.team_claimed_reserve(Team(0)));
    assert!(table.player(Seat(0)).hand().is_empty());
    assert_eq!(table.reserve(Team(0)).len(), 11);
    assert!(!table.player(Seat(0)).has_received_reserve());

    // Seats 1 and 2 play; seat 0 still waits with an empty hand.
    for _ in 0..2 {
        pass_turn(&mut table);
        assert_ne!(table.current_seat(), Seat(0));
        assert_eq!(table.pending_reserve(), Some(Seat(0)));
        assert!(!table.player(Seat(0)).has_received_reserve());
        assert!(table.player(Seat(0)).hand().is_empty());
        assert_eq!(table.reserve(Team(0)).len(), 11);
    }

    pass_turn(&mut table);

    assert_eq!(table.current_seat(), Seat(0));
    assert_eq!(table.pending_reserve(), None);
    assert_eq!(table.player(Seat(0)).hand().len(), 11);
    assert!(table.player(Seat(0)).has_received_reserve());
    table.check_invariants().unwrap();
}

#[test]
fn test_second_knock_needs_clean_canastra() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("9C"))
        .with_received_reserve(Seat(1))
        .with_phase(TurnPhase::Discard)
        .build()
        .unwrap();
    let before = table.clone();

    assert_eq!(table.discard(cards("9C")[0]), Err(RuleError::CleanCanastraRequired));
    assert_eq!(table, before);
}

#[test]
fn test_final_knock_ends_game() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("9C"))
        .with_sequence(Seat(1), Suit::Spades, &cards("3S 4S 5S 6S 7S 8S 9S"))
        .with_received_reserve(Seat(1))
        .with_phase(TurnPhase::Discard)
        .build()
        .unwrap();
    assert!(table.team_has_clean_canastra(Team(0)));

    table.discard(cards("9C")[0]).unwrap();

    assert!(table.is_game_over());
    assert_eq!(table.last_knock(), Some((Seat(0), KnockKind::Final)));
    let outcome = table.outcome().unwrap();
    assert_eq!(outcome.reason, EndReason::FinalKnock);
    assert_eq!(outcome.breakdown[Team(0)].went_out_bonus, 100);
    assert_eq!(outcome.breakdown[Team(0)].reserve_penalty, 0);
    assert_eq!(outcome.breakdown[Team(1)].reserve_penalty, 100);
    assert_eq!(table.player(Seat(0)).points(), table.player(Seat(1)).points());
    assert_eq!(table.player(Seat(2)).points(), outcome.score(Team(1)));
}

#[test]
fn test_last_card_is_not_stranded() {
    let setup = TableSetup::new()
        .with_hand(Seat(0), &cards("5H 6H 7H 9C"))
        .with_phase(TurnPhase::LayDown);

    let mut claimed = setup.clone().with_received_reserve(Seat(0)).build().unwrap();
    assert_eq!(
        claimed.lay_down_sequence(Suit::Hearts, &cards("5H 6H 7H")),
        Err(RuleError::WouldStrandLastCard)
    );
    assert_eq!(claimed.current_player().hand().len(), 4);
    assert!(claimed.current_player().melds().is_empty());

    // Before the reserve is claimed a lone card can still be discarded.
    let mut fresh = setup.build().unwrap();
    fresh.lay_down_sequence(Suit::Hearts, &cards("5H 6H 7H")).unwrap();
    assert_eq!(fresh.current_player().hand(), cards("9C").as_slice());
    fresh.end_lay_down_phase().unwrap();
    fresh.discard(cards("9C")[0]).unwrap();
    assert_eq!(fresh.last_knock(), Some((Seat(0), KnockKind::Indirect)));
}

// =============================================================================
// End of game
// =============================================================================

#[test]
fn test_stock_exhausted_at_turn_change() {
    let mut table = TableSetup::new()
        .with_stock(&cards("AS"))
        .with_seed(2)
        .build()
        .unwrap();

    pass_turn(&mut table);

    assert!(table.is_game_over());
    assert_eq!(table.outcome().unwrap().reason, EndReason::StockExhausted);
    assert_eq!(table.phase(), TurnPhase::Ended);
}

#[test]
fn test_nothing_to_draw_ends_game() {
    let mut table = TableSetup::new().with_stock(&[]).build().unwrap();
    assert!(table.end_if_exhausted());
    assert_eq!(table.outcome().unwrap().reason, EndReason::PilesExhausted);

    let mut table = TableSetup::new()
        .with_stock(&[])
        .with_discard(&cards("4C"))
        .build()
        .unwrap();
    assert!(!table.end_if_exhausted());
    table.draw_from_discard().unwrap();
    assert_eq!(table.phase(), TurnPhase::LayDown);
}

#[test]
fn test_scores_are_recorded_per_team() {
    let mut table = TableSetup::new()
        .with_hand(Seat(0), &cards("4D"))
        .with_hand(Seat(1), &cards("5D 6D"))
        .with_hand(Seat(2), &cards("7D"))
        .with_hand(Seat(3), &[])
        .with_sequence(Seat(2), Suit::Clubs, &cards("3C 4C 5C"))
        .with_received_reserve(Seat(2))
        .with_stock(&[])
        .build()
        .unwrap();
    table.draw_from_stock().unwrap();

    let outcome = table.outcome().unwrap();
    // Seats 0 and 1: hands -30, reserve never picked up
    assert_eq!(outcome.score(Team(0)), -30 - 100);
    // Seats 2 and 3: melds 30, hands -10, seat 3 holds no cards
    assert_eq!(outcome.score(Team(1)), 30 - 10 + 100);
    assert_eq!(outcome.winner(), Some(Team(1)));
}
