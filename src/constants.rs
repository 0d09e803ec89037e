//! Configuration constants for the kviz game system
//!
//! This module groups the fixed rules of the game: the point scales of the
//! two board rounds, the hidden-question quota, and the timing of the
//! countdown and the delayed board transitions.

/// Board layout and scoring constants
pub mod board {
    /// Number of questions every theme must have
    pub const QUESTIONS_PER_THEME: usize = 5;
    /// Point values for round 1 questions, indexed by position within a theme
    pub const ROUND_ONE_POINTS: [i64; QUESTIONS_PER_THEME] = [100, 200, 300, 400, 500];
    /// Point values for round 2 questions, indexed by position within a theme
    pub const ROUND_TWO_POINTS: [i64; QUESTIONS_PER_THEME] = [200, 400, 600, 800, 1000];
    /// Number of questions marked as hidden (redirect) questions per round
    pub const HIDDEN_PER_ROUND: usize = 2;
    /// Maximum length of a theme name in characters
    pub const MAX_THEME_NAME_LENGTH: usize = 100;
    /// Maximum length of question and answer text in characters
    pub const MAX_TEXT_LENGTH: usize = 1000;
}

/// Countdown timer constants
pub mod timer {
    /// Seconds on the per-question countdown after every reset
    pub const QUESTION_SECONDS: u32 = 15;
    /// Interval between countdown ticks, in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 1000;
}

/// Delays for presenter-visible board transitions
pub mod delays {
    /// Pause before the board auto-advances from round 1 to round 2, in
    /// milliseconds, so the last answered tile stays visible for a moment
    pub const ROUND_ADVANCE_MS: u64 = 500;
    /// Pause on the completed screen before the super game settles, in
    /// milliseconds
    pub const SUPER_GAME_FINISH_MS: u64 = 1000;
}

/// Super game (finale) constants
pub mod super_game {
    /// Minimum number of finale themes the catalog must provide; the
    /// elimination phase needs at least one theme to strike out
    pub const MIN_THEMES: usize = 2;
    /// Smallest bet a finale participant may place
    pub const MIN_BET: i64 = 1;
}
