//! Per-question countdown timer
//!
//! A single monotonic countdown owned by the game state machine. Ticks are
//! driven externally by a one-second scheduling callback; because a scheduled
//! tick can fire after the question it belonged to has closed, every reset
//! bumps a generation counter and tick alarms carry the generation they were
//! scheduled under. A tick whose generation no longer matches is stale and
//! must not act.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Outcome of applying a tick to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown decremented and keeps running; schedule the next tick
    Running,
    /// The countdown reached zero and deactivated itself
    Expired,
    /// The tick was stale or the countdown was not running; nothing changed
    Ignored,
}

/// The per-question countdown state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    /// Remaining seconds
    seconds: u32,
    /// Whether the countdown is currently running
    active: bool,
    /// Identity of the current countdown; bumped on every reset so that
    /// ticks scheduled against an earlier countdown are rejected
    generation: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            seconds: constants::timer::QUESTION_SECONDS,
            active: false,
            generation: 0,
        }
    }
}

impl Countdown {
    /// Remaining seconds on the countdown
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Whether the countdown is currently running
    pub fn active(&self) -> bool {
        self.active
    }

    /// The identity of the current countdown
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Restores the countdown to full seconds, stopped, with a new identity
    ///
    /// Any tick scheduled before this call becomes stale.
    pub fn reset(&mut self) {
        self.seconds = constants::timer::QUESTION_SECONDS;
        self.active = false;
        self.generation += 1;
    }

    /// Starts the countdown
    ///
    /// Returns `true` when a tick should be scheduled; starting an exhausted
    /// countdown is a no-op.
    pub fn start(&mut self) -> bool {
        if self.seconds == 0 || self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Pauses the countdown; remaining seconds are preserved
    ///
    /// Also bumps the generation: a tick scheduled before the pause is
    /// stale, otherwise pausing and resuming within one interval would leave
    /// two live tick chains decrementing the same countdown.
    pub fn stop(&mut self) {
        self.active = false;
        self.generation += 1;
    }

    /// Applies one tick scheduled under `generation`
    ///
    /// Decrements while running and positive; forces the countdown inactive
    /// when it reaches zero. Stale ticks (mismatched generation, stopped or
    /// exhausted countdown) change nothing.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || !self.active || self.seconds == 0 {
            return TickOutcome::Ignored;
        }
        self.seconds -= 1;
        if self.seconds == 0 {
            self.active = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }
}
