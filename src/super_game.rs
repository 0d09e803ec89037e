//! Super game (finale) sub-machine
//!
//! The finale runs over the players holding a positive score when it starts:
//! they take turns striking finale themes until one survives, each places a
//! bet between 1 and their score on the surviving theme's question, the
//! presenter marks every answer correct or wrong, and the bets are settled
//! into the main scores. Phases are strictly linear; nothing skips ahead and
//! nothing goes back.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    catalog::FinaleTheme,
    constants,
    game::Error,
    ledger::{Id, Roster},
};

/// The four phases of the finale, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Participants take turns striking themes until one remains
    Elimination,
    /// Every participant places a bet on the surviving theme
    Betting,
    /// The presenter marks every participant's answer
    Answering,
    /// Terminal marker; held briefly before the root machine settles bets
    Completed,
}

/// State of a running finale
///
/// Created by the root machine when the finale starts and destroyed when it
/// completes; it never outlives the phase sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperGame {
    phase: Phase,
    /// Finale themes snapshotted from the catalog at start
    themes: Vec<FinaleTheme>,
    /// Names of themes struck out so far, in elimination order
    eliminated: Vec<String>,
    /// The surviving theme, set when elimination completes
    selected_theme: Option<FinaleTheme>,
    /// Bets placed so far
    bets: HashMap<Id, i64>,
    /// Answer verdicts recorded so far
    answers: HashMap<Id, bool>,
    /// Players eligible at finale start, in roster order; defines turn order
    participants: Vec<Id>,
    /// Index into `participants` of whoever strikes the next theme
    current_player_index: usize,
}

impl SuperGame {
    /// Starts a finale over the given themes and participants
    ///
    /// `participants` must be the players with positive score at start, in
    /// roster order; the caller guarantees it is non-empty.
    pub fn new(themes: Vec<FinaleTheme>, participants: Vec<Id>) -> Self {
        Self {
            phase: Phase::Elimination,
            themes,
            eliminated: Vec::new(),
            selected_theme: None,
            bets: HashMap::new(),
            answers: HashMap::new(),
            participants,
            current_player_index: 0,
        }
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The snapshotted finale themes
    pub fn themes(&self) -> &[FinaleTheme] {
        &self.themes
    }

    /// Struck-out theme names in elimination order
    pub fn eliminated(&self) -> &[String] {
        &self.eliminated
    }

    /// The surviving theme, once elimination has completed
    pub fn selected_theme(&self) -> Option<&FinaleTheme> {
        self.selected_theme.as_ref()
    }

    /// Bets placed so far
    pub fn bets(&self) -> &HashMap<Id, i64> {
        &self.bets
    }

    /// Answer verdicts recorded so far
    pub fn answers(&self) -> &HashMap<Id, bool> {
        &self.answers
    }

    /// The finale participants in turn order
    pub fn participants(&self) -> &[Id] {
        &self.participants
    }

    /// The participant whose turn it is to strike a theme
    pub fn current_player(&self) -> Option<Id> {
        self.participants.get(self.current_player_index).copied()
    }

    /// Themes not yet struck out, in catalog order
    pub fn remaining_themes(&self) -> Vec<&FinaleTheme> {
        self.themes
            .iter()
            .filter(|theme| !self.eliminated.contains(&theme.name))
            .collect()
    }

    /// The completion signal of the elimination phase: the sole surviving
    /// theme, if exactly one remains
    pub fn sole_remaining_theme(&self) -> Option<&FinaleTheme> {
        self.remaining_themes().into_iter().exactly_one().ok()
    }

    fn require_phase(&self, expected: Phase) -> Result<(), Error> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Error::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Strikes a theme out and passes the turn to the next participant
    ///
    /// # Errors
    ///
    /// - [`Error::WrongPhase`] outside the elimination phase
    /// - [`Error::InvalidTheme`] for an unknown name, an already struck
    ///   theme, or the last remaining theme (which must be chosen by
    ///   completing the phase, not removed)
    pub fn eliminate_theme(&mut self, name: &str) -> Result<(), Error> {
        self.require_phase(Phase::Elimination)?;

        if !self.themes.iter().any(|theme| theme.name == name) {
            return Err(Error::InvalidTheme(name.to_string()));
        }
        if self.eliminated.iter().any(|eliminated| eliminated == name) {
            return Err(Error::InvalidTheme(name.to_string()));
        }
        if self.remaining_themes().len() <= 1 {
            return Err(Error::InvalidTheme(name.to_string()));
        }

        self.eliminated.push(name.to_string());
        self.current_player_index = (self.current_player_index + 1) % self.participants.len();
        debug!(theme = name, remaining = self.remaining_themes().len(), "finale theme eliminated");
        Ok(())
    }

    /// Locks in the sole surviving theme and opens the betting phase
    ///
    /// # Errors
    ///
    /// - [`Error::WrongPhase`] outside the elimination phase
    /// - [`Error::PhaseIncomplete`] while more than one theme survives
    pub fn complete_elimination(&mut self) -> Result<(), Error> {
        self.require_phase(Phase::Elimination)?;
        let survivor = self
            .sole_remaining_theme()
            .cloned()
            .ok_or(Error::PhaseIncomplete(Phase::Elimination))?;

        debug!(theme = %survivor.name, "finale theme selected");
        self.selected_theme = Some(survivor);
        self.phase = Phase::Betting;
        self.current_player_index = 0;
        Ok(())
    }

    /// Records a participant's bet on the selected theme
    ///
    /// `score` is the participant's live score; the bet must lie within
    /// `[1, score]`.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongPhase`] outside the betting phase
    /// - [`Error::InvalidBet`] for a non-participant or an out-of-range
    ///   amount; `bets` is untouched in either case
    pub fn place_bet(&mut self, player: Id, amount: i64, score: i64) -> Result<(), Error> {
        self.require_phase(Phase::Betting)?;

        if !self.participants.contains(&player)
            || amount < constants::super_game::MIN_BET
            || amount > score
        {
            return Err(Error::InvalidBet { player, amount });
        }

        self.bets.insert(player, amount);
        Ok(())
    }

    /// Closes betting once every participant has placed a bet
    ///
    /// # Errors
    ///
    /// - [`Error::WrongPhase`] outside the betting phase
    /// - [`Error::PhaseIncomplete`] while any participant has no bet
    pub fn complete_betting(&mut self) -> Result<(), Error> {
        self.require_phase(Phase::Betting)?;
        if !self.participants.iter().all(|id| self.bets.contains_key(id)) {
            return Err(Error::PhaseIncomplete(Phase::Betting));
        }
        self.phase = Phase::Answering;
        self.current_player_index = 0;
        Ok(())
    }

    /// Records whether a participant answered the finale question correctly
    ///
    /// # Errors
    ///
    /// - [`Error::WrongPhase`] outside the answering phase
    /// - [`Error::UnknownPlayer`] for a non-participant
    pub fn mark_answer(&mut self, player: Id, correct: bool) -> Result<(), Error> {
        self.require_phase(Phase::Answering)?;
        if !self.participants.contains(&player) {
            return Err(Error::UnknownPlayer(player));
        }
        self.answers.insert(player, correct);
        Ok(())
    }

    /// Moves to the terminal phase once every answer is recorded
    ///
    /// The root machine holds the completed phase briefly for display before
    /// settling the bets.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongPhase`] outside the answering phase
    /// - [`Error::PhaseIncomplete`] while any participant has no verdict
    pub fn complete_answering(&mut self) -> Result<(), Error> {
        self.require_phase(Phase::Answering)?;
        if !self.participants.iter().all(|id| self.answers.contains_key(id)) {
            return Err(Error::PhaseIncomplete(Phase::Answering));
        }
        self.phase = Phase::Completed;
        Ok(())
    }

    /// Applies the finale outcome to the main scores
    ///
    /// Every player with both a recorded bet and a recorded verdict gains
    /// the bet when correct and loses it otherwise; everyone else is
    /// untouched.
    pub fn settle(&self, roster: &mut Roster) {
        for player in &self.participants {
            let (Some(bet), Some(correct)) = (self.bets.get(player), self.answers.get(player))
            else {
                continue;
            };
            let new_score = if *correct {
                roster.award(*player, *bet)
            } else {
                roster.deduct(*player, *bet)
            };
            debug!(player = %player, bet, correct, score = ?new_score, "finale bet settled");
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::catalog::Answer;

    fn finale_themes(names: &[&str]) -> Vec<FinaleTheme> {
        names
            .iter()
            .map(|name| FinaleTheme {
                name: (*name).to_string(),
                question: format!("{name}?"),
                media: None,
                answer: Answer {
                    text: format!("{name}!"),
                    media: None,
                },
            })
            .collect()
    }

    fn four_theme_game() -> SuperGame {
        SuperGame::new(
            finale_themes(&["A", "B", "C", "D"]),
            vec![Id::new(1), Id::new(2)],
        )
    }

    #[test]
    fn test_elimination_needs_exactly_three_strikes() {
        let mut game = four_theme_game();

        assert!(matches!(
            game.complete_elimination(),
            Err(Error::PhaseIncomplete(Phase::Elimination))
        ));

        game.eliminate_theme("A").unwrap();
        game.eliminate_theme("B").unwrap();
        assert!(game.sole_remaining_theme().is_none());
        game.eliminate_theme("C").unwrap();

        // The last theme cannot be struck; it must be chosen by completion.
        assert!(matches!(
            game.eliminate_theme("D"),
            Err(Error::InvalidTheme(_))
        ));

        game.complete_elimination().unwrap();
        assert_eq!(game.phase(), Phase::Betting);
        assert_eq!(game.selected_theme().unwrap().name, "D");
        assert_eq!(game.current_player(), Some(Id::new(1)));
    }

    #[test]
    fn test_turn_cycles_through_participants() {
        let mut game = four_theme_game();
        assert_eq!(game.current_player(), Some(Id::new(1)));
        game.eliminate_theme("A").unwrap();
        assert_eq!(game.current_player(), Some(Id::new(2)));
        game.eliminate_theme("B").unwrap();
        assert_eq!(game.current_player(), Some(Id::new(1)));
    }

    #[test]
    fn test_repeat_and_unknown_eliminations_rejected() {
        let mut game = four_theme_game();
        game.eliminate_theme("A").unwrap();
        assert!(matches!(
            game.eliminate_theme("A"),
            Err(Error::InvalidTheme(_))
        ));
        assert!(matches!(
            game.eliminate_theme("Nope"),
            Err(Error::InvalidTheme(_))
        ));
        assert_eq!(game.eliminated(), ["A"]);
    }

    fn betting_game() -> SuperGame {
        let mut game = four_theme_game();
        for name in ["A", "B", "C"] {
            game.eliminate_theme(name).unwrap();
        }
        game.complete_elimination().unwrap();
        game
    }

    #[test]
    fn test_bet_bounds() {
        let mut game = betting_game();
        let player = Id::new(1);

        assert!(matches!(
            game.place_bet(player, 0, 500),
            Err(Error::InvalidBet { .. })
        ));
        assert!(matches!(
            game.place_bet(player, 501, 500),
            Err(Error::InvalidBet { .. })
        ));
        assert!(game.bets().is_empty(), "rejected bets must not be recorded");

        game.place_bet(player, 500, 500).unwrap();
        assert_eq!(game.bets().get(&player), Some(&500));
    }

    #[test]
    fn test_non_participant_cannot_bet() {
        let mut game = betting_game();
        assert!(matches!(
            game.place_bet(Id::new(9), 100, 500),
            Err(Error::InvalidBet { .. })
        ));
    }

    #[test]
    fn test_betting_completes_only_when_everyone_bet() {
        let mut game = betting_game();
        game.place_bet(Id::new(1), 100, 500).unwrap();
        assert!(matches!(
            game.complete_betting(),
            Err(Error::PhaseIncomplete(Phase::Betting))
        ));
        game.place_bet(Id::new(2), 50, 200).unwrap();
        game.complete_betting().unwrap();
        assert_eq!(game.phase(), Phase::Answering);
    }

    #[test]
    fn test_phases_are_strictly_linear() {
        let mut game = four_theme_game();
        assert!(matches!(
            game.place_bet(Id::new(1), 10, 100),
            Err(Error::WrongPhase { .. })
        ));
        assert!(matches!(
            game.mark_answer(Id::new(1), true),
            Err(Error::WrongPhase { .. })
        ));
        assert!(matches!(
            game.complete_answering(),
            Err(Error::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_answering_and_settlement() {
        let mut game = betting_game();
        game.place_bet(Id::new(1), 300, 500).unwrap();
        game.place_bet(Id::new(2), 100, 200).unwrap();
        game.complete_betting().unwrap();

        game.mark_answer(Id::new(1), true).unwrap();
        assert!(matches!(
            game.complete_answering(),
            Err(Error::PhaseIncomplete(Phase::Answering))
        ));
        game.mark_answer(Id::new(2), false).unwrap();
        game.complete_answering().unwrap();
        assert_eq!(game.phase(), Phase::Completed);

        let mut roster = Roster::new(["one", "two", "three"]);
        roster.award(Id::new(1), 500);
        roster.award(Id::new(2), 200);
        game.settle(&mut roster);
        assert_eq!(roster.score_of(Id::new(1)), Some(800));
        assert_eq!(roster.score_of(Id::new(2)), Some(100));
        assert_eq!(roster.score_of(Id::new(3)), Some(0), "non-participant untouched");
    }
}
