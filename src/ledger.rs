//! Player roster and scoring ledger
//!
//! This module owns the fixed session roster and every score mutation in the
//! game. Scores are signed and unbounded; they only change through the
//! operations here, so the rest of the state machine can treat the ledger as
//! the single source of truth for standings and finale eligibility.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// A unique, session-stable identifier for a player
///
/// Ids are assigned sequentially when the roster is created and never change
/// or get reused within a session. They serialize as strings so that maps
/// keyed by `Id` survive a JSON round-trip.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct Id(u32);

impl Id {
    /// Creates an id from its raw numeric value
    pub fn new(value: u32) -> Self {
        Self(value)
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Id {
    type Err = ParseIntError;

    /// Parses an id from its decimal string form
    ///
    /// # Errors
    ///
    /// Returns a `ParseIntError` if the string is not a valid number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(u32::from_str(s)?))
    }
}

/// A single participant in the game session
///
/// Players are created once from the initial roster and never deleted
/// mid-session; only their score changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Session-stable identifier
    pub id: Id,
    /// Display name shown by the view layer
    pub name: String,
    /// Current score; may go negative
    pub score: i64,
}

/// The fixed set of players for a session with their live scores
///
/// The roster preserves creation order, which also defines the turn order of
/// the super game elimination phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Creates a roster from the initial list of player names
    ///
    /// Ids are assigned sequentially starting from 1 and all scores start
    /// at zero.
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(names: I) -> Self {
        Self {
            players: names
                .into_iter()
                .enumerate()
                .map(|(index, name)| Player {
                    id: Id(u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1)),
                    name: name.into(),
                    score: 0,
                })
                .collect(),
        }
    }

    /// Returns all players in creation order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the number of players in the session
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Checks whether the roster has no players
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Looks up a player by id
    pub fn get(&self, id: Id) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Checks whether a player with the given id exists
    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    /// Returns the current score of a player, or `None` for an unknown id
    pub fn score_of(&self, id: Id) -> Option<i64> {
        self.get(id).map(|player| player.score)
    }

    /// Adds `amount` to the named player's score
    ///
    /// Returns the new score, or `None` if no such player exists (in which
    /// case nothing is mutated).
    pub fn award(&mut self, id: Id, amount: i64) -> Option<i64> {
        let player = self.players.iter_mut().find(|player| player.id == id)?;
        player.score += amount;
        Some(player.score)
    }

    /// Subtracts `amount` from the named player's score
    ///
    /// Returns the new score, or `None` if no such player exists.
    pub fn deduct(&mut self, id: Id, amount: i64) -> Option<i64> {
        self.award(id, -amount)
    }

    /// Returns the ids of players with a positive score, in roster order
    ///
    /// This is the super game eligibility rule.
    pub fn eligible(&self) -> Vec<Id> {
        self.players
            .iter()
            .filter(|player| player.score > 0)
            .map(|player| player.id)
            .collect()
    }

    /// Resets every score to zero, keeping ids and names
    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.score = 0;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(["Dasha", "Nastya", "Ira", "Artyom", "Maksim"])
    }

    #[test]
    fn test_ids_are_sequential_and_stable() {
        let roster = roster();
        let ids: Vec<_> = roster.players().iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![Id(1), Id(2), Id(3), Id(4), Id(5)],
            "ids follow roster order"
        );
        assert!(roster.contains(Id(3)));
        assert!(!roster.contains(Id(6)));
    }

    #[test]
    fn test_award_and_deduct() {
        let mut roster = roster();
        assert_eq!(roster.award(Id(1), 300), Some(300));
        assert_eq!(roster.deduct(Id(1), 500), Some(-200));
        assert_eq!(roster.score_of(Id(1)), Some(-200));
    }

    #[test]
    fn test_award_unknown_player_changes_nothing() {
        let mut roster = roster();
        assert_eq!(roster.award(Id(42), 100), None);
        assert!(roster.players().iter().all(|p| p.score == 0));
    }

    #[test]
    fn test_eligible_filters_positive_scores_in_order() {
        let mut roster = roster();
        roster.award(Id(4), 100);
        roster.award(Id(2), 200);
        roster.deduct(Id(1), 100);
        assert_eq!(roster.eligible(), vec![Id(2), Id(4)]);
    }

    #[test]
    fn test_reset_scores() {
        let mut roster = roster();
        roster.award(Id(1), 500);
        roster.reset_scores();
        assert!(roster.eligible().is_empty());
        assert_eq!(roster.len(), 5);
    }

    #[test]
    fn test_id_string_round_trip() {
        let id = Id(17);
        let as_string = id.to_string();
        assert_eq!(as_string.parse::<Id>().unwrap(), id);
    }
}
