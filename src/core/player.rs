//! Seat and team identification and per-seat data storage.
//!
//! ## Seat
//!
//! Four seats around the table, 0-based. Seats 0 and 1 form team 0, seats
//! 2 and 3 form team 1. Play passes from seat `n` to seat `n + 1`.
//!
//! ## SeatMap / TeamMap
//!
//! Fixed-size per-seat and per-team storage indexable by `Seat` and `Team`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats at the table.
pub const SEAT_COUNT: usize = 4;

/// Number of partnerships.
pub const TEAM_COUNT: usize = 2;

/// A seat at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a seat. Values wrap into `0..4`.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id % SEAT_COUNT as u8)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The partnership this seat plays for.
    #[must_use]
    pub const fn team(self) -> Team {
        Team(self.0 / 2)
    }

    /// The seat that plays after this one.
    #[must_use]
    pub const fn next(self) -> Seat {
        Seat::new(self.0 + 1)
    }

    /// The other seat on the same team.
    #[must_use]
    pub const fn partner(self) -> Seat {
        Seat(self.0 ^ 1)
    }

    /// Iterate over all four seats in turn order.
    ///
    /// ```
    /// use canastra::core::Seat;
    ///
    /// let seats: Vec<_> = Seat::all().collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[3], Seat::new(3));
    /// ```
    pub fn all() -> impl Iterator<Item = Seat> {
        (0..SEAT_COUNT as u8).map(Seat)
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// A partnership of two seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team(pub u8);

impl Team {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id % TEAM_COUNT as u8)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The opposing team.
    #[must_use]
    pub const fn other(self) -> Team {
        Team(self.0 ^ 1)
    }

    /// The two seats of this team.
    #[must_use]
    pub const fn seats(self) -> [Seat; 2] {
        [Seat(self.0 * 2), Seat(self.0 * 2 + 1)]
    }

    pub fn all() -> impl Iterator<Item = Team> {
        (0..TEAM_COUNT as u8).map(Team)
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.0 + 1)
    }
}

/// Per-seat data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; SEAT_COUNT],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: std::array::from_fn(|i| factory(Seat(i as u8))),
        }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over (Seat, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (Seat(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}

/// Per-team data storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: [T; TEAM_COUNT],
}

impl<T> TeamMap<T> {
    pub fn new(factory: impl Fn(Team) -> T) -> Self {
        Self {
            data: std::array::from_fn(|i| factory(Team(i as u8))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (Team(i as u8), v))
    }
}

impl<T> Index<Team> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: Team) -> &Self::Output {
        &self.data[team.index()]
    }
}

impl<T> IndexMut<Team> for TeamMap<T> {
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        &mut self.data[team.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_basics() {
        let s0 = Seat::new(0);
        assert_eq!(s0.index(), 0);
        assert_eq!(format!("{}", s0), "Seat 0");
        assert_eq!(Seat::new(5), Seat::new(1));
    }

    #[test]
    fn test_seat_teams() {
        assert_eq!(Seat::new(0).team(), Team(0));
        assert_eq!(Seat::new(1).team(), Team(0));
        assert_eq!(Seat::new(2).team(), Team(1));
        assert_eq!(Seat::new(3).team(), Team(1));
        assert_eq!(Seat::new(0).partner(), Seat::new(1));
        assert_eq!(Seat::new(3).partner(), Seat::new(2));
        assert_eq!(Team(1).seats(), [Seat(2), Seat(3)]);
        assert_eq!(Team(0).other(), Team(1));
    }

    #[test]
    fn test_seat_next_wraps() {
        assert_eq!(Seat::new(0).next(), Seat::new(1));
        assert_eq!(Seat::new(3).next(), Seat::new(0));
    }

    #[test]
    fn test_seat_map() {
        let mut map: SeatMap<i32> = SeatMap::new(|s| s.index() as i32 * 10);
        assert_eq!(map[Seat::new(2)], 20);
        map[Seat::new(1)] = 7;
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[1], (Seat::new(1), &7));
    }

    #[test]
    fn test_team_map() {
        let mut map: TeamMap<Vec<u8>> = TeamMap::default();
        map[Team(1)].push(3);
        assert!(map[Team(0)].is_empty());
        assert_eq!(map[Team(1)], vec![3]);
    }

    #[test]
    fn test_seat_map_serialization() {
        let map: SeatMap<i32> = SeatMap::new(|s| s.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SeatMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
