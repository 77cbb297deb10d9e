//! The table: authoritative game state and the turn state machine.
//!
//! ## Turn structure
//!
//! `Draw -> LayDown -> Discard -> (next seat) Draw`, plus the terminal
//! `Ended`. Each mutating operation is legal in exactly one phase and
//! returns a `RuleError` (leaving the table untouched) anywhere else.
//!
//! ## Knocks
//!
//! A seat "knocks" when its hand becomes empty. The kind of knock is decided
//! at that moment from what emptied the hand:
//!
//! - meld play, team has not claimed its reserve: **direct**, the seat picks
//!   up the reserve pile at once and keeps laying down
//! - discard, team has not claimed its reserve: **indirect**, play moves on
//!   and the seat picks up the reserve when its turn comes round again
//! - team already claimed its reserve: **final**, the game ends. Only allowed
//!   when the team has a clean canastra on the table.
//!
//! A team has claimed its reserve once either seat picked it up or is
//! waiting to pick it up after an indirect knock.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cards::{cards_value, full_deck, meld, Card, Meld, MeldKind, Suit, DECK_SIZE};
use crate::core::{GameRng, Seat, SeatMap, TableConfig, Team, TeamMap, SEAT_COUNT};

use super::error::{InvariantError, RuleError};
use super::scoring::{score_table, EndReason, ScoreSummary};

/// Phase of the current seat's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Draw,
    LayDown,
    Discard,
    Ended,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnPhase::Draw => "draw",
            TurnPhase::LayDown => "lay-down",
            TurnPhase::Discard => "discard",
            TurnPhase::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Kind of knock, decided when a hand becomes empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnockKind {
    /// Emptied by a meld play; reserve picked up immediately.
    Direct,
    /// Emptied by a discard; reserve picked up on the seat's next turn.
    Indirect,
    /// Team already claimed its reserve; the game ends.
    Final,
}

/// What emptied a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptiedBy {
    MeldPlay,
    Discard,
}

/// One seat's hand, melds and score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub(crate) name: String,
    pub(crate) team: Team,
    pub(crate) is_human: bool,
    pub(crate) hand: Vec<Card>,
    pub(crate) melds: Vec<Meld>,
    pub(crate) points: i32,
    pub(crate) has_received_reserve: bool,
}

impl PlayerState {
    pub(crate) fn new(name: String, team: Team, is_human: bool) -> Self {
        Self {
            name,
            team,
            is_human,
            hand: Vec::new(),
            melds: Vec::new(),
            points: 0,
            has_received_reserve: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn team(&self) -> Team {
        self.team
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        self.is_human
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[must_use]
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// Recorded score. Zero until the game ends.
    #[must_use]
    pub fn points(&self) -> i32 {
        self.points
    }

    #[must_use]
    pub fn has_received_reserve(&self) -> bool {
        self.has_received_reserve
    }

    #[must_use]
    pub fn hand_value(&self) -> i32 {
        cards_value(&self.hand)
    }

    #[must_use]
    pub fn meld_value(&self) -> i32 {
        self.melds.iter().map(Meld::point_value).sum()
    }

    #[must_use]
    pub fn has_clean_canastra(&self) -> bool {
        self.melds.iter().any(Meld::is_clean_canastra)
    }

    #[must_use]
    pub fn has_dirty_canastra(&self) -> bool {
        self.melds.iter().any(Meld::is_dirty_canastra)
    }

    /// Remove the first card equal to `card`, returning where it was.
    fn take_card(&mut self, card: Card) -> Option<usize> {
        let pos = self.hand.iter().position(|c| *c == card)?;
        self.hand.remove(pos);
        Some(pos)
    }
}

/// Complete game state for four seats.
///
/// Cloning is a plain value copy; search clones a table for every sample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub(crate) config: TableConfig,
    pub(crate) players: SeatMap<PlayerState>,
    /// Top of the stock is the last element.
    pub(crate) stock: Vec<Card>,
    /// Top of the pile is the last element.
    pub(crate) discard: Vec<Card>,
    pub(crate) reserves: TeamMap<Vec<Card>>,
    pub(crate) current: Seat,
    pub(crate) phase: TurnPhase,
    pub(crate) pending_reserve: Option<Seat>,
    pub(crate) turn_number: u32,
    pub(crate) last_knock: Option<(Seat, KnockKind)>,
    pub(crate) outcome: Option<ScoreSummary>,
    pub(crate) messages: Vec<String>,
    pub(crate) record_messages: bool,
}

impl Table {
    /// Shuffle a full deck and deal a new game.
    ///
    /// Each seat gets `hand_size` cards, each team's reserve pile gets
    /// `reserve_size`, the rest is the stock. The discard pile starts empty
    /// and the first seat is chosen at random.
    pub fn new(config: TableConfig, rng: &mut GameRng) -> Self {
        let mut stock = full_deck();
        rng.shuffle(&mut stock);

        let mut players = SeatMap::new(|seat| {
            PlayerState::new(config.names[seat].clone(), seat.team(), config.human[seat])
        });
        for _ in 0..config.hand_size {
            for seat in Seat::all() {
                if let Some(card) = stock.pop() {
                    players[seat].hand.push(card);
                }
            }
        }

        let mut reserves: TeamMap<Vec<Card>> = TeamMap::default();
        for team in Team::all() {
            for _ in 0..config.reserve_size {
                if let Some(card) = stock.pop() {
                    reserves[team].push(card);
                }
            }
        }

        let current = Seat::new(rng.gen_range_usize(0..SEAT_COUNT) as u8);
        let mut table = Self::assemble(config, players, stock, Vec::new(), reserves, current, TurnPhase::Draw);
        debug!(seed = rng.seed(), first = current.index(), "dealt new game");
        table.log(format!("{} starts the game", table.players[current].name));
        table
    }

    /// Deal a default game (seat 0 human) from a seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(TableConfig::default(), &mut GameRng::new(seed))
    }

    pub(crate) fn assemble(
        config: TableConfig,
        players: SeatMap<PlayerState>,
        stock: Vec<Card>,
        discard: Vec<Card>,
        reserves: TeamMap<Vec<Card>>,
        current: Seat,
        phase: TurnPhase,
    ) -> Self {
        Self {
            config,
            players,
            stock,
            discard,
            reserves,
            current,
            phase,
            pending_reserve: None,
            turn_number: 0,
            last_knock: None,
            outcome: None,
            messages: Vec::new(),
            record_messages: true,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    #[must_use]
    pub fn current_seat(&self) -> Seat {
        self.current
    }

    #[must_use]
    pub fn current_player(&self) -> &PlayerState {
        &self.players[self.current]
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == TurnPhase::Ended
    }

    #[must_use]
    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.players[seat]
    }

    pub fn players(&self) -> impl Iterator<Item = (Seat, &PlayerState)> {
        self.players.iter()
    }

    #[must_use]
    pub fn stock(&self) -> &[Card] {
        &self.stock
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    #[must_use]
    pub fn discard_top(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    /// Cards still waiting in a team's reserve pile.
    #[must_use]
    pub fn reserve(&self, team: Team) -> &[Card] {
        &self.reserves[team]
    }

    /// Seat owed its team's reserve on its next turn, after an indirect knock.
    #[must_use]
    pub fn pending_reserve(&self) -> Option<Seat> {
        self.pending_reserve
    }

    /// Number of completed seat turns.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Most recent knock.
    #[must_use]
    pub fn last_knock(&self) -> Option<(Seat, KnockKind)> {
        self.last_knock
    }

    /// Final score summary, once the game has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<&ScoreSummary> {
        self.outcome.as_ref()
    }

    /// Plain-text log of what happened, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Is the game still in its opening phase (large stock)?
    #[must_use]
    pub fn is_early_game(&self) -> bool {
        self.stock.len() > self.config.early_game_stock
    }

    /// Meld value minus hand value across both seats of a team.
    #[must_use]
    pub fn team_live_points(&self, team: Team) -> i32 {
        team.seats()
            .iter()
            .map(|seat| {
                let player = &self.players[*seat];
                player.meld_value() - player.hand_value()
            })
            .sum()
    }

    /// Every meld a team has on the table, with its owner and index.
    pub fn team_melds(&self, team: Team) -> impl Iterator<Item = (Seat, usize, &Meld)> {
        team.seats().into_iter().flat_map(move |seat| {
            self.players[seat]
                .melds
                .iter()
                .enumerate()
                .map(move |(i, m)| (seat, i, m))
        })
    }

    #[must_use]
    pub fn team_has_clean_canastra(&self, team: Team) -> bool {
        team.seats().iter().any(|s| self.players[*s].has_clean_canastra())
    }

    #[must_use]
    pub fn team_has_dirty_canastra(&self, team: Team) -> bool {
        team.seats().iter().any(|s| self.players[*s].has_dirty_canastra())
    }

    /// Has either seat picked up, or been promised, the team's reserve?
    #[must_use]
    pub fn team_claimed_reserve(&self, team: Team) -> bool {
        team.seats().iter().any(|s| self.players[*s].has_received_reserve)
            || self.pending_reserve.is_some_and(|s| s.team() == team)
    }

    /// Could the current seat add `card` to meld `index` of `owner`?
    ///
    /// Checks team ownership and the meld rules only, not whether the card
    /// is in hand.
    #[must_use]
    pub fn can_add_to_meld(&self, owner: Seat, index: usize, card: Card) -> bool {
        owner.team() == self.current.team()
            && self.players[owner]
                .melds
                .get(index)
                .is_some_and(|m| m.can_add(card))
    }

    // === Operations ===

    fn require_phase(&self, action: &'static str, expected: TurnPhase) -> Result<(), RuleError> {
        match self.phase {
            TurnPhase::Ended => Err(RuleError::GameOver),
            actual if actual != expected => Err(RuleError::WrongPhase {
                action,
                expected,
                actual,
            }),
            _ => Ok(()),
        }
    }

    /// Draw the top card of the stock. Drawing from an empty stock ends the
    /// game instead.
    pub fn draw_from_stock(&mut self) -> Result<(), RuleError> {
        self.require_phase("draw from the stock", TurnPhase::Draw)?;
        let seat = self.current;

        let Some(card) = self.stock.pop() else {
            self.log("The stock is empty".to_string());
            self.end_game(EndReason::StockExhausted);
            return Ok(());
        };

        self.players[seat].hand.push(card);
        self.phase = TurnPhase::LayDown;
        trace!(seat = seat.index(), %card, "drew from stock");
        self.log(format!("{} drew from the stock", self.players[seat].name));
        Ok(())
    }

    /// Take the entire discard pile into hand.
    pub fn draw_from_discard(&mut self) -> Result<(), RuleError> {
        self.require_phase("take the discard pile", TurnPhase::Draw)?;
        if self.discard.is_empty() {
            return Err(RuleError::EmptyDiscardPile);
        }

        let seat = self.current;
        let pile = std::mem::take(&mut self.discard);
        let count = pile.len();
        self.players[seat].hand.extend(pile);
        self.phase = TurnPhase::LayDown;
        trace!(seat = seat.index(), count, "took discard pile");
        self.log(format!("{} took the discard pile ({} cards)", self.players[seat].name, count));
        Ok(())
    }

    /// Lay down a new sequence of `suit` from the current hand.
    pub fn lay_down_sequence(&mut self, suit: Suit, cards: &[Card]) -> Result<(), RuleError> {
        self.lay_down(MeldKind::Sequence(suit), cards)
    }

    /// Lay down a new set from the current hand.
    pub fn lay_down_set(&mut self, cards: &[Card]) -> Result<(), RuleError> {
        self.lay_down(MeldKind::Set, cards)
    }

    fn lay_down(&mut self, kind: MeldKind, cards: &[Card]) -> Result<(), RuleError> {
        self.require_phase("lay down a meld", TurnPhase::LayDown)?;
        let seat = self.current;
        let before = self.players[seat].hand.clone();

        for card in cards {
            if self.players[seat].take_card(*card).is_none() {
                self.players[seat].hand = before;
                return Err(RuleError::CardNotInHand(*card));
            }
        }

        let meld = match Meld::new(kind, cards) {
            Ok(meld) => meld,
            Err(err) => {
                self.players[seat].hand = before;
                return Err(err.into());
            }
        };
        self.players[seat].melds.push(meld);

        let knock = match self.knock_for(seat, EmptiedBy::MeldPlay) {
            Ok(knock) => knock,
            Err(err) => {
                self.players[seat].melds.pop();
                self.players[seat].hand = before;
                return Err(err);
            }
        };

        trace!(seat = seat.index(), %kind, cards = cards.len(), "laid down meld");
        self.log(format!(
            "{} laid down a {} of {} cards",
            self.players[seat].name,
            kind,
            cards.len()
        ));
        if let Some(kind) = knock {
            self.apply_knock(seat, kind);
        }
        Ok(())
    }

    /// Add a card from hand to an existing meld of the current seat, or of
    /// its partner when `target` names the partner.
    pub fn add_to_meld(&mut self, meld_index: usize, card: Card, target: Option<Seat>) -> Result<(), RuleError> {
        self.require_phase("add to a meld", TurnPhase::LayDown)?;
        let seat = self.current;
        let owner = target.unwrap_or(seat);

        if owner.team() != seat.team() {
            return Err(RuleError::OpponentMeld { owner });
        }
        if meld_index >= self.players[owner].melds.len() {
            return Err(RuleError::NoSuchMeld {
                owner,
                index: meld_index,
            });
        }
        let Some(pos) = self.players[seat].take_card(card) else {
            return Err(RuleError::CardNotInHand(card));
        };

        if let Err(err) = self.players[owner].melds[meld_index].add_card(card) {
            self.players[seat].hand.insert(pos, card);
            return Err(err.into());
        }

        let knock = match self.knock_for(seat, EmptiedBy::MeldPlay) {
            Ok(knock) => knock,
            Err(err) => {
                self.players[owner].melds[meld_index].pop_last();
                self.players[seat].hand.insert(pos, card);
                return Err(err);
            }
        };

        trace!(seat = seat.index(), owner = owner.index(), meld_index, %card, "added to meld");
        if owner == seat {
            self.log(format!("{} added {} to meld {}", self.players[seat].name, card, meld_index + 1));
        } else {
            self.log(format!(
                "{} added {} to meld {} of {}",
                self.players[seat].name,
                card,
                meld_index + 1,
                self.players[owner].name
            ));
        }
        if let Some(kind) = knock {
            self.apply_knock(seat, kind);
        }
        Ok(())
    }

    /// Finish laying down and move to the discard phase.
    pub fn end_lay_down_phase(&mut self) -> Result<(), RuleError> {
        self.require_phase("end the lay-down phase", TurnPhase::LayDown)?;
        self.phase = TurnPhase::Discard;
        trace!(seat = self.current.index(), "ended lay-down");
        Ok(())
    }

    /// Discard a card, ending the turn (or the game, on a final knock).
    pub fn discard(&mut self, card: Card) -> Result<(), RuleError> {
        self.require_phase("discard", TurnPhase::Discard)?;
        let seat = self.current;

        let Some(pos) = self.players[seat].take_card(card) else {
            return Err(RuleError::CardNotInHand(card));
        };
        self.discard.push(card);

        let knock = match self.knock_for(seat, EmptiedBy::Discard) {
            Ok(knock) => knock,
            Err(err) => {
                self.discard.pop();
                self.players[seat].hand.insert(pos, card);
                return Err(err);
            }
        };

        trace!(seat = seat.index(), %card, "discarded");
        self.log(format!("{} discarded {}", self.players[seat].name, card));
        match knock {
            Some(kind) => self.apply_knock(seat, kind),
            None => self.advance_turn(),
        }
        Ok(())
    }

    /// End the game when the current seat must draw and there is nothing at
    /// all to draw. Returns whether the game ended.
    pub fn end_if_exhausted(&mut self) -> bool {
        if self.phase == TurnPhase::Draw && self.stock.is_empty() && self.discard.is_empty() {
            self.log("No cards left to draw".to_string());
            self.end_game(EndReason::PilesExhausted);
            true
        } else {
            false
        }
    }

    // === Knocks and turn flow ===

    /// Decide what the seat's hand size means after a mutation caused by
    /// `cause`, or reject the mutation.
    ///
    /// A meld play may not leave a single card in hand when the team could
    /// not go out with it: the final discard would be refused and the turn
    /// could never finish.
    fn knock_for(&self, seat: Seat, cause: EmptiedBy) -> Result<Option<KnockKind>, RuleError> {
        let team = seat.team();
        let claimed = self.team_claimed_reserve(team);
        let can_go_out = self.team_has_clean_canastra(team);

        match (self.players[seat].hand.len(), cause) {
            (0, EmptiedBy::MeldPlay) if !claimed => Ok(Some(KnockKind::Direct)),
            (0, EmptiedBy::Discard) if !claimed => Ok(Some(KnockKind::Indirect)),
            (0, _) if can_go_out => Ok(Some(KnockKind::Final)),
            (0, _) => Err(RuleError::CleanCanastraRequired),
            (1, EmptiedBy::MeldPlay) if claimed && !can_go_out => Err(RuleError::WouldStrandLastCard),
            _ => Ok(None),
        }
    }

    fn apply_knock(&mut self, seat: Seat, kind: KnockKind) {
        self.last_knock = Some((seat, kind));
        debug!(seat = seat.index(), ?kind, "knock");
        match kind {
            KnockKind::Direct => {
                self.log(format!("{} went out directly", self.players[seat].name));
                self.grant_reserve(seat);
            }
            KnockKind::Indirect => {
                self.log(format!(
                    "{} went out by discarding and will pick up the reserve next turn",
                    self.players[seat].name
                ));
                self.pending_reserve = Some(seat);
                self.advance_turn();
            }
            KnockKind::Final => {
                self.log(format!("{} went out for the last time", self.players[seat].name));
                self.end_game(EndReason::FinalKnock);
            }
        }
    }

    fn grant_reserve(&mut self, seat: Seat) {
        let team = seat.team();
        let cards = std::mem::take(&mut self.reserves[team]);
        let count = cards.len();
        let player = &mut self.players[seat];
        player.hand.extend(cards);
        player.has_received_reserve = true;
        debug!(seat = seat.index(), count, "picked up reserve");
        self.log(format!("{} picked up the reserve pile ({} cards)", self.players[seat].name, count));
    }

    fn advance_turn(&mut self) {
        self.current = self.current.next();
        self.phase = TurnPhase::Draw;
        self.turn_number += 1;

        if self.pending_reserve == Some(self.current) {
            self.pending_reserve = None;
            self.grant_reserve(self.current);
        }
        self.log(format!("{}'s turn", self.players[self.current].name));

        if self.stock.is_empty() {
            self.log("The stock is empty".to_string());
            self.end_game(EndReason::StockExhausted);
        }
    }

    fn end_game(&mut self, reason: EndReason) {
        self.phase = TurnPhase::Ended;
        let summary = score_table(self, reason);

        for (seat, player) in self.players.iter_mut() {
            player.points = summary.score(seat.team());
        }
        for (team, score) in summary.breakdown.iter() {
            self.log(format!(
                "{}: melds {}, hands -{}, bonus {}, penalty -{}, total {}",
                team,
                score.meld_points,
                score.hand_points,
                score.went_out_bonus,
                score.reserve_penalty,
                score.total()
            ));
        }
        debug!(
            %reason,
            team1 = summary.score(Team(0)),
            team2 = summary.score(Team(1)),
            turns = self.turn_number,
            "game over"
        );
        self.outcome = Some(summary);
    }

    fn log(&mut self, message: String) {
        if self.record_messages {
            self.messages.push(message);
        }
    }

    /// Stop recording log messages and drop the existing ones. Search clones
    /// are silenced so that copying them stays cheap.
    pub(crate) fn silence(&mut self) {
        self.record_messages = false;
        self.messages.clear();
    }

    // === Invariants ===

    /// Verify card conservation and that every meld still validates.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut counts: FxHashMap<Card, usize> = FxHashMap::default();
        let mut total = 0;
        let mut tally = |cards: &[Card]| {
            for card in cards {
                *counts.entry(*card).or_default() += 1;
                total += 1;
            }
        };

        tally(&self.stock);
        tally(&self.discard);
        for (_, cards) in self.reserves.iter() {
            tally(cards);
        }
        for player in self.players.values() {
            tally(&player.hand);
            for m in &player.melds {
                tally(m.cards());
            }
        }

        if total != DECK_SIZE {
            return Err(InvariantError::CardCount {
                expected: DECK_SIZE,
                actual: total,
            });
        }

        let mut expected: FxHashMap<Card, usize> = FxHashMap::default();
        for card in full_deck() {
            *expected.entry(card).or_default() += 1;
        }
        for (card, want) in expected {
            let got = counts.get(&card).copied().unwrap_or(0);
            if got != want {
                return Err(InvariantError::CardMultiplicity {
                    card,
                    expected: want,
                    actual: got,
                });
            }
        }

        for (seat, player) in self.players.iter() {
            for (index, m) in player.melds.iter().enumerate() {
                meld::validate(m.kind(), m.cards()).map_err(|source| InvariantError::InvalidMeld {
                    owner: seat,
                    index,
                    source,
                })?;
            }
        }
        Ok(())
    }
}
