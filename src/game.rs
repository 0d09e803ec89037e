//! Core game state machine
//!
//! This module owns the root [`Game`] aggregate: the board, the roster, the
//! active question lifecycle, the countdown, the hidden-question redirect
//! sub-flow, and the super game sub-machine. The view layer issues intents
//! (directly or through [`Intent`]); each one is validated against the
//! current state, applied synchronously, and either succeeds or is rejected
//! with an [`Error`] that leaves the state untouched. The only asynchronous
//! activity is the handful of delayed [`AlarmMessage`]s, which re-read the
//! current state when they fire so that stale callbacks cannot act.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use crate::{
    catalog::{Board, BoardRound, CatalogData},
    constants,
    ledger::{Id, Roster},
    redirect::RedirectState,
    super_game::{Phase, SuperGame},
    timer::{Countdown, TickOutcome},
};

/// A recoverable, operation-local rejection
///
/// Every variant refuses a single intent and preserves the current state;
/// none of them terminate the session. The view surfaces the reason to the
/// presenter so they can correct their input.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The selected question has already been played
    #[error("that question has already been answered")]
    AlreadyAnswered,
    /// The board coordinates do not name a question
    #[error("no question at theme {theme_index}, position {question_index}")]
    NoSuchQuestion {
        /// Index of the theme on the board
        theme_index: usize,
        /// Position within the theme
        question_index: usize,
    },
    /// The id does not belong to any roster player
    #[error("no player with id {0}")]
    UnknownPlayer(Id),
    /// Scoring requires an open question
    #[error("no question is currently open")]
    QuestionNotOpen,
    /// A new question cannot be selected while one is open or a hidden
    /// question awaits its target
    #[error("another question is already open")]
    QuestionAlreadyOpen,
    /// A redirect target was chosen but no hidden question is pending
    #[error("no hidden question is awaiting a target")]
    NoRedirectPending,
    /// A hidden question must go to a player other than the one who picked it
    #[error("the hidden question cannot stay with player {0}")]
    InvalidRedirectTarget(Id),
    /// The super game needs at least one player with a positive score
    #[error("no player has a positive score")]
    NoEligiblePlayers,
    /// A finale operation arrived while no super game is running
    #[error("the super game is not running")]
    SuperGameNotRunning,
    /// The named finale theme cannot be eliminated: it is unknown, already
    /// struck, or the last one remaining
    #[error("cannot eliminate finale theme {0:?}")]
    InvalidTheme(String),
    /// The bet is outside `[1, score]` or comes from a non-participant
    #[error("invalid bet of {amount} by player {player}")]
    InvalidBet {
        /// The player who tried to bet
        player: Id,
        /// The rejected amount
        amount: i64,
    },
    /// A finale operation arrived in the wrong phase
    #[error("operation belongs to the {expected:?} phase, but the finale is in {actual:?}")]
    WrongPhase {
        /// The phase the operation belongs to
        expected: Phase,
        /// The phase the finale is actually in
        actual: Phase,
    },
    /// A phase-completion call arrived before the phase was finished
    #[error("the {0:?} phase is not finished yet")]
    PhaseIncomplete(Phase),
}

/// The stage the session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    /// Round 1: the 100-500 board
    One,
    /// Round 2: the 200-1000 board
    Two,
    /// The super game finale overlay
    Super,
}

impl Round {
    /// The board round shown during this stage, if any
    pub fn board_round(self) -> Option<BoardRound> {
        match self {
            Self::One => Some(BoardRound::One),
            Self::Two => Some(BoardRound::Two),
            Self::Super => None,
        }
    }
}

/// The currently open question; exists only between opening and closing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentQuestion {
    /// Index of the theme on the board
    pub theme_index: usize,
    /// Position of the question within its theme
    pub question_index: usize,
    /// Points at stake, from the fixed per-round table
    pub point_value: i64,
}

/// Delayed messages the machine schedules for itself
///
/// Each is a fire-once callback handed to the embedding shell together with
/// its delay; when it comes back through [`Game::receive_alarm`], the machine
/// re-reads the current state and ignores the message if the state it was
/// scheduled against has since changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// One countdown tick, carrying the countdown identity it was scheduled
    /// under
    TimerTick {
        /// Countdown generation at scheduling time
        generation: u64,
    },
    /// The delayed round 1 to round 2 board switch
    AdvanceRound,
    /// The delayed settlement after the finale reaches its completed phase
    FinishSuperGame,
}

/// Board-level intents issued by the view layer
#[derive(Debug, Clone, Deserialize)]
pub enum BoardIntent {
    /// Open the question at the given coordinates (or trigger its redirect)
    SelectQuestion {
        /// Index of the theme on the board
        theme_index: usize,
        /// Position within the theme
        question_index: usize,
    },
    /// Make the named player the active one
    SelectPlayer {
        /// The player to activate
        player: Id,
    },
    /// Hand the pending hidden question to the named player
    ChooseRedirectTarget {
        /// The player receiving the question
        player: Id,
    },
    /// Add points to the named player's score
    AwardPoints {
        /// The player to credit
        player: Id,
        /// Points to add
        amount: i64,
    },
    /// Subtract points from the named player's score
    DeductPoints {
        /// The player to debit
        player: Id,
        /// Points to subtract
        amount: i64,
    },
    /// Close the open question, marking it answered
    CloseQuestion,
    /// Destroy the session state and start over; requires explicit presenter
    /// confirmation in the view before it is issued
    ResetGame,
}

/// Countdown intents issued by the view layer
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum TimerIntent {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Stop,
}

/// Finale intents issued by the view layer
#[derive(Debug, Clone, Deserialize)]
pub enum FinaleIntent {
    /// Begin the super game over the players with positive score
    Start,
    /// Strike a finale theme
    EliminateTheme {
        /// Name of the theme to strike
        name: String,
    },
    /// Lock in the surviving theme and open betting
    CompleteElimination,
    /// Record a participant's bet
    PlaceBet {
        /// The betting player
        player: Id,
        /// The amount staked
        amount: i64,
    },
    /// Close betting once everyone has bet
    CompleteBetting,
    /// Record whether a participant answered correctly
    MarkAnswer {
        /// The answering player
        player: Id,
        /// The presenter's verdict
        correct: bool,
    },
    /// Close answering once every verdict is in
    CompleteAnswering,
    /// Settle the bets and drop the finale overlay
    CompleteSuperGame,
}

/// Every transition the view layer can request, as one closed set
#[derive(Debug, Clone, Deserialize, derive_more::From)]
pub enum Intent {
    /// Board and scoring operations
    Board(BoardIntent),
    /// Countdown operations
    Timer(TimerIntent),
    /// Super game operations
    Finale(FinaleIntent),
}

/// The root game aggregate for one session
///
/// Exclusively owns every nested entity; nothing is shared or referenced
/// from two places, and players are looked up by id wherever needed. The
/// whole aggregate serializes into the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// The two-round board plus the finale theme list
    board: Board,
    /// The fixed roster with live scores
    roster: Roster,
    /// The currently highlighted player, if any
    active_player: Option<Id>,
    /// The open question, if any
    current_question: Option<CurrentQuestion>,
    /// The hidden-question redirect, between selection and close
    redirect: Option<RedirectState>,
    /// The per-question countdown
    timer: Countdown,
    /// The stage the session is in
    round: Round,
    /// The finale sub-machine while it runs
    super_game: Option<SuperGame>,
}

impl Game {
    /// Creates a fresh session from catalog data and the initial roster
    ///
    /// # Errors
    ///
    /// Returns a [`crate::catalog::Error`] when the catalog data is
    /// malformed; that is a fatal startup condition.
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(
        catalog: &CatalogData,
        player_names: I,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, crate::catalog::Error> {
        Ok(Self {
            board: Board::from_catalog(catalog, rng)?,
            roster: Roster::new(player_names),
            active_player: None,
            current_question: None,
            redirect: None,
            timer: Countdown::default(),
            round: Round::One,
            super_game: None,
        })
    }

    /// The board with both rounds and the finale list
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The roster with live scores
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The currently highlighted player
    pub fn active_player(&self) -> Option<Id> {
        self.active_player
    }

    /// The open question, if any
    pub fn current_question(&self) -> Option<CurrentQuestion> {
        self.current_question
    }

    /// The redirect state, if a hidden question is pending or open
    pub fn redirect(&self) -> Option<&RedirectState> {
        self.redirect.as_ref()
    }

    /// The per-question countdown
    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    /// The stage the session is in
    pub fn round(&self) -> Round {
        self.round
    }

    /// The finale sub-machine while it runs
    pub fn super_game(&self) -> Option<&SuperGame> {
        self.super_game.as_ref()
    }

    /// Whether every question of the given board round has been answered
    pub fn round_complete(&self, round: BoardRound) -> bool {
        self.board.round_complete(round)
    }

    /// Dispatches one view-layer intent
    ///
    /// Equivalent to calling the corresponding transition method; rejections
    /// are logged and returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates the rejection of the underlying operation.
    pub fn apply<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        intent: Intent,
        mut schedule: S,
    ) -> Result<(), Error> {
        let result = match intent {
            Intent::Board(BoardIntent::SelectQuestion {
                theme_index,
                question_index,
            }) => self.select_question(theme_index, question_index),
            Intent::Board(BoardIntent::SelectPlayer { player }) => self.select_player(player),
            Intent::Board(BoardIntent::ChooseRedirectTarget { player }) => {
                self.choose_redirect_target(player)
            }
            Intent::Board(BoardIntent::AwardPoints { player, amount }) => {
                self.award_points(player, amount)
            }
            Intent::Board(BoardIntent::DeductPoints { player, amount }) => {
                self.deduct_points(player, amount)
            }
            Intent::Board(BoardIntent::CloseQuestion) => {
                self.close_question(&mut schedule);
                Ok(())
            }
            Intent::Board(BoardIntent::ResetGame) => {
                self.reset_game(&mut fastrand::Rng::new());
                Ok(())
            }
            Intent::Timer(TimerIntent::Start) => {
                self.start_timer(&mut schedule);
                Ok(())
            }
            Intent::Timer(TimerIntent::Stop) => {
                self.stop_timer();
                Ok(())
            }
            Intent::Finale(FinaleIntent::Start) => self.start_super_game(),
            Intent::Finale(FinaleIntent::EliminateTheme { name }) => self.eliminate_theme(&name),
            Intent::Finale(FinaleIntent::CompleteElimination) => self.complete_elimination(),
            Intent::Finale(FinaleIntent::PlaceBet { player, amount }) => {
                self.place_bet(player, amount)
            }
            Intent::Finale(FinaleIntent::CompleteBetting) => self.complete_betting(),
            Intent::Finale(FinaleIntent::MarkAnswer { player, correct }) => {
                self.mark_answer(player, correct)
            }
            Intent::Finale(FinaleIntent::CompleteAnswering) => {
                self.complete_answering(&mut schedule)
            }
            Intent::Finale(FinaleIntent::CompleteSuperGame) => self.complete_super_game(),
        };

        if let Err(error) = &result {
            warn!(%error, "intent rejected");
        }
        result
    }

    /// Makes the named player the active one
    ///
    /// Valid at any time; an open question is not required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPlayer`] for an id outside the roster.
    pub fn select_player(&mut self, player: Id) -> Result<(), Error> {
        if !self.roster.contains(player) {
            return Err(Error::UnknownPlayer(player));
        }
        self.active_player = Some(player);
        Ok(())
    }

    /// Selects a board question
    ///
    /// An unanswered regular question opens immediately with the point value
    /// of the fixed `(round, position)` table and a fresh, stopped countdown.
    /// A hidden question opens the redirect sub-flow instead; the question
    /// itself stays closed until a target player is chosen.
    ///
    /// # Errors
    ///
    /// - [`Error::QuestionAlreadyOpen`] while another question is open or a
    ///   hidden question still awaits its target
    /// - [`Error::NoSuchQuestion`] for out-of-range coordinates
    /// - [`Error::AlreadyAnswered`] for a question that was already played
    pub fn select_question(
        &mut self,
        theme_index: usize,
        question_index: usize,
    ) -> Result<(), Error> {
        if self.current_question.is_some()
            || self.redirect.as_ref().is_some_and(RedirectState::awaiting)
        {
            return Err(Error::QuestionAlreadyOpen);
        }
        let question = self
            .board
            .question(theme_index, question_index)
            .ok_or(Error::NoSuchQuestion {
                theme_index,
                question_index,
            })?;
        if question.answered {
            return Err(Error::AlreadyAnswered);
        }
        let hidden = question.hidden;

        let point_value = self
            .board
            .point_value(theme_index, question_index)
            .ok_or(Error::NoSuchQuestion {
                theme_index,
                question_index,
            })?;

        if hidden {
            debug!(theme_index, question_index, "hidden question intercepted");
            self.redirect = Some(RedirectState::awaiting_target(
                self.active_player,
                theme_index,
                question_index,
                point_value,
            ));
            return Ok(());
        }

        debug!(theme_index, question_index, point_value, "question opened");
        self.current_question = Some(CurrentQuestion {
            theme_index,
            question_index,
            point_value,
        });
        self.timer.reset();
        Ok(())
    }

    /// Hands the pending hidden question to the named player and opens it
    ///
    /// The chosen player becomes the active player; the redirect state stays
    /// populated (for the view's banner) until the question closes.
    ///
    /// # Errors
    ///
    /// - [`Error::NoRedirectPending`] when no hidden question awaits a target
    /// - [`Error::UnknownPlayer`] for an id outside the roster
    /// - [`Error::InvalidRedirectTarget`] when the target is the player the
    ///   question was intercepted from
    pub fn choose_redirect_target(&mut self, player: Id) -> Result<(), Error> {
        let Some(redirect) = self.redirect.as_mut().filter(|r| r.awaiting()) else {
            return Err(Error::NoRedirectPending);
        };
        if !self.roster.contains(player) {
            return Err(Error::UnknownPlayer(player));
        }
        if !redirect.allows_target(player) {
            return Err(Error::InvalidRedirectTarget(player));
        }

        redirect.resolve(player);
        let (theme_index, question_index, point_value) = (
            redirect.theme_index,
            redirect.question_index,
            redirect.point_value,
        );

        debug!(%player, theme_index, question_index, "hidden question redirected");
        self.active_player = Some(player);
        self.current_question = Some(CurrentQuestion {
            theme_index,
            question_index,
            point_value,
        });
        self.timer.reset();
        Ok(())
    }

    /// Starts the countdown, scheduling the first tick if it was stopped
    pub fn start_timer<S: FnMut(AlarmMessage, web_time::Duration)>(&mut self, mut schedule: S) {
        if self.timer.start() {
            schedule(
                AlarmMessage::TimerTick {
                    generation: self.timer.generation(),
                },
                web_time::Duration::from_millis(constants::timer::TICK_INTERVAL_MS),
            );
        }
    }

    /// Pauses the countdown; remaining seconds are preserved
    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    /// Adds points to the named player's score
    ///
    /// # Errors
    ///
    /// - [`Error::QuestionNotOpen`] while no question is open; scoring is
    ///   always tied to the question at stake
    /// - [`Error::UnknownPlayer`] for an id outside the roster
    pub fn award_points(&mut self, player: Id, amount: i64) -> Result<(), Error> {
        if self.current_question.is_none() {
            return Err(Error::QuestionNotOpen);
        }
        let score = self
            .roster
            .award(player, amount)
            .ok_or(Error::UnknownPlayer(player))?;
        debug!(%player, amount, score, "points awarded");
        Ok(())
    }

    /// Subtracts points from the named player's score
    ///
    /// # Errors
    ///
    /// Same guards as [`Game::award_points`].
    pub fn deduct_points(&mut self, player: Id, amount: i64) -> Result<(), Error> {
        if self.current_question.is_none() {
            return Err(Error::QuestionNotOpen);
        }
        let score = self
            .roster
            .deduct(player, amount)
            .ok_or(Error::UnknownPlayer(player))?;
        debug!(%player, amount, score, "points deducted");
        Ok(())
    }

    /// Closes the open question
    ///
    /// Marks it answered (irreversibly for the session), clears the current
    /// question and any redirect state, and resets the countdown. A no-op
    /// while no question is open. When this was the last question of round 1
    /// the delayed board switch to round 2 is scheduled.
    pub fn close_question<S: FnMut(AlarmMessage, web_time::Duration)>(&mut self, mut schedule: S) {
        let Some(current) = self.current_question.take() else {
            return;
        };

        if let Some(question) = self
            .board
            .question_mut(current.theme_index, current.question_index)
        {
            question.answered = true;
        }
        self.redirect = None;
        self.timer.reset();
        debug!(
            theme_index = current.theme_index,
            question_index = current.question_index,
            "question closed"
        );

        // Round 1 auto-advances after a short pause; round 2 never does.
        if self.round == Round::One && self.round_complete(BoardRound::One) {
            schedule(
                AlarmMessage::AdvanceRound,
                web_time::Duration::from_millis(constants::delays::ROUND_ADVANCE_MS),
            );
        }
    }

    /// Begins the super game over the players with positive score
    ///
    /// Snapshots the finale themes and the eligible players, switches the
    /// stage to [`Round::Super`] and puts the finale into its elimination
    /// phase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEligiblePlayers`] (with no state change) when
    /// nobody holds a positive score.
    pub fn start_super_game(&mut self) -> Result<(), Error> {
        let eligible = self.roster.eligible();
        if eligible.is_empty() {
            return Err(Error::NoEligiblePlayers);
        }
        debug!(participants = eligible.len(), "super game started");
        self.super_game = Some(SuperGame::new(self.board.finale.clone(), eligible));
        self.round = Round::Super;
        Ok(())
    }

    fn finale_mut(&mut self) -> Result<&mut SuperGame, Error> {
        self.super_game.as_mut().ok_or(Error::SuperGameNotRunning)
    }

    /// Strikes a finale theme; see [`SuperGame::eliminate_theme`]
    ///
    /// # Errors
    ///
    /// [`Error::SuperGameNotRunning`] outside the finale, otherwise the
    /// sub-machine's rejections.
    pub fn eliminate_theme(&mut self, name: &str) -> Result<(), Error> {
        self.finale_mut()?.eliminate_theme(name)
    }

    /// Locks in the surviving finale theme; see
    /// [`SuperGame::complete_elimination`]
    ///
    /// # Errors
    ///
    /// [`Error::SuperGameNotRunning`] outside the finale, otherwise the
    /// sub-machine's rejections.
    pub fn complete_elimination(&mut self) -> Result<(), Error> {
        self.finale_mut()?.complete_elimination()
    }

    /// Records a finale bet, validated against the player's live score
    ///
    /// # Errors
    ///
    /// [`Error::SuperGameNotRunning`] outside the finale,
    /// [`Error::UnknownPlayer`] for an id outside the roster, otherwise the
    /// sub-machine's rejections.
    pub fn place_bet(&mut self, player: Id, amount: i64) -> Result<(), Error> {
        let score = self
            .roster
            .score_of(player)
            .ok_or(Error::UnknownPlayer(player))?;
        self.finale_mut()?.place_bet(player, amount, score)
    }

    /// Closes finale betting; see [`SuperGame::complete_betting`]
    ///
    /// # Errors
    ///
    /// [`Error::SuperGameNotRunning`] outside the finale, otherwise the
    /// sub-machine's rejections.
    pub fn complete_betting(&mut self) -> Result<(), Error> {
        self.finale_mut()?.complete_betting()
    }

    /// Records a finale answer verdict; see [`SuperGame::mark_answer`]
    ///
    /// # Errors
    ///
    /// [`Error::SuperGameNotRunning`] outside the finale, otherwise the
    /// sub-machine's rejections.
    pub fn mark_answer(&mut self, player: Id, correct: bool) -> Result<(), Error> {
        self.finale_mut()?.mark_answer(player, correct)
    }

    /// Closes finale answering and schedules the delayed settlement
    ///
    /// The finale holds its completed phase for a moment so the presenter
    /// sees the last verdict before the scores settle.
    ///
    /// # Errors
    ///
    /// [`Error::SuperGameNotRunning`] outside the finale, otherwise the
    /// sub-machine's rejections.
    pub fn complete_answering<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mut schedule: S,
    ) -> Result<(), Error> {
        self.finale_mut()?.complete_answering()?;
        schedule(
            AlarmMessage::FinishSuperGame,
            web_time::Duration::from_millis(constants::delays::SUPER_GAME_FINISH_MS),
        );
        Ok(())
    }

    /// Settles the finale bets into the main scores and drops the overlay
    ///
    /// The stage field is left as it is; only the finale sub-machine is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SuperGameNotRunning`] when there is nothing to
    /// settle.
    pub fn complete_super_game(&mut self) -> Result<(), Error> {
        let finale = self.super_game.take().ok_or(Error::SuperGameNotRunning)?;
        finale.settle(&mut self.roster);
        debug!("super game settled");
        Ok(())
    }

    /// Destroys the session state and starts over
    ///
    /// Re-runs the catalog loader's hidden-question draw, zeroes every
    /// score, and drops the open question, redirect, countdown progress and
    /// finale. Alarms scheduled before the reset are neutralized by the
    /// staleness guards in [`Game::receive_alarm`].
    pub fn reset_game(&mut self, rng: &mut fastrand::Rng) {
        self.board.reset(rng);
        self.roster.reset_scores();
        self.active_player = None;
        self.current_question = None;
        self.redirect = None;
        self.timer.reset();
        self.round = Round::One;
        self.super_game = None;
        debug!("game reset");
    }

    /// Handles a previously scheduled alarm
    ///
    /// Every alarm re-validates against the current state: a countdown tick
    /// from a superseded countdown, a round switch after a reset, or a
    /// finale settlement after the finale is gone all fall through without
    /// effect.
    pub fn receive_alarm<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: AlarmMessage,
        mut schedule: S,
    ) {
        match message {
            AlarmMessage::TimerTick { generation } => {
                if self.timer.tick(generation) == TickOutcome::Running {
                    schedule(
                        AlarmMessage::TimerTick { generation },
                        web_time::Duration::from_millis(constants::timer::TICK_INTERVAL_MS),
                    );
                }
            }
            AlarmMessage::AdvanceRound => {
                if self.round == Round::One
                    && self.round_complete(BoardRound::One)
                    && self.current_question.is_none()
                {
                    debug!("advancing to round 2");
                    self.round = Round::Two;
                }
            }
            AlarmMessage::FinishSuperGame => {
                if self
                    .super_game
                    .as_ref()
                    .is_some_and(|finale| finale.phase() == Phase::Completed)
                {
                    // Cannot fail: the finale was just checked to exist.
                    let _ = self.complete_super_game();
                }
            }
        }
    }

    /// Re-arms the delayed transitions after a snapshot restore
    ///
    /// Scheduled alarms live only in the embedding shell, so a snapshot
    /// taken inside one of the delay windows loses them and the restored
    /// session would otherwise sit on a finished round 1 board or a
    /// completed finale forever. Everything the alarms carry is derivable
    /// from state: a running countdown gets its tick chain back, a finished
    /// round 1 board gets the board switch, and a finale held in its
    /// completed phase gets its settlement.
    pub fn resume<S: FnMut(AlarmMessage, web_time::Duration)>(&self, mut schedule: S) {
        if self.timer.active() {
            schedule(
                AlarmMessage::TimerTick {
                    generation: self.timer.generation(),
                },
                web_time::Duration::from_millis(constants::timer::TICK_INTERVAL_MS),
            );
        }
        if self.round == Round::One
            && self.round_complete(BoardRound::One)
            && self.current_question.is_none()
        {
            schedule(
                AlarmMessage::AdvanceRound,
                web_time::Duration::from_millis(constants::delays::ROUND_ADVANCE_MS),
            );
        }
        if self
            .super_game
            .as_ref()
            .is_some_and(|finale| finale.phase() == Phase::Completed)
        {
            schedule(
                AlarmMessage::FinishSuperGame,
                web_time::Duration::from_millis(constants::delays::SUPER_GAME_FINISH_MS),
            );
        }
    }
}
