//! Hidden-question redirect sub-flow
//!
//! Selecting a question flagged as hidden does not open it. Instead the
//! presenter must reassign the answering player first; only then does the
//! question open, against the chosen player. The state here exists from the
//! moment a hidden question is selected until the question closes, so the
//! view can keep showing the redirect banner while the question is open.

use serde::{Deserialize, Serialize};

use crate::ledger::Id;

/// State of an in-flight or resolved redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectState {
    /// The player who picked the question (the active player at selection
    /// time, which may be nobody)
    pub original_player: Option<Id>,
    /// The player the question was handed to; `None` while the presenter is
    /// still choosing
    pub selected_player: Option<Id>,
    /// Board coordinates of the intercepted question
    pub theme_index: usize,
    /// Position of the intercepted question within its theme
    pub question_index: usize,
    /// Point value the question will be worth once it opens
    pub point_value: i64,
}

impl RedirectState {
    /// Captures a freshly intercepted hidden question awaiting a target
    pub fn awaiting_target(
        original_player: Option<Id>,
        theme_index: usize,
        question_index: usize,
        point_value: i64,
    ) -> Self {
        Self {
            original_player,
            selected_player: None,
            theme_index,
            question_index,
            point_value,
        }
    }

    /// Whether the presenter still has to choose a target player
    ///
    /// While this holds, the view must show only the redirect prompt and
    /// never the question text.
    pub fn awaiting(&self) -> bool {
        self.selected_player.is_none()
    }

    /// Whether `target` is a legal redirect target
    ///
    /// The question must go to a player other than the one who picked it.
    pub fn allows_target(&self, target: Id) -> bool {
        self.original_player != Some(target)
    }

    /// Records the chosen target, resolving the redirect
    pub fn resolve(&mut self, target: Id) {
        self.selected_player = Some(target);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_original_player_as_target() {
        let redirect = RedirectState::awaiting_target(Some(Id::new(1)), 0, 2, 300);
        assert!(!redirect.allows_target(Id::new(1)));
        assert!(redirect.allows_target(Id::new(2)));
    }

    #[test]
    fn test_any_target_allowed_without_original_player() {
        let redirect = RedirectState::awaiting_target(None, 0, 0, 100);
        assert!(redirect.allows_target(Id::new(1)));
    }

    #[test]
    fn test_resolve_clears_awaiting() {
        let mut redirect = RedirectState::awaiting_target(Some(Id::new(1)), 1, 3, 400);
        assert!(redirect.awaiting());
        redirect.resolve(Id::new(2));
        assert!(!redirect.awaiting());
        assert_eq!(redirect.selected_player, Some(Id::new(2)));
    }
}
