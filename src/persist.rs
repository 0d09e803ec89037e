//! Session snapshot persistence
//!
//! The whole [`Game`] aggregate serializes into one JSON blob; whatever the
//! embedding shell uses as storage only has to hold a single string. Saves
//! are fire-and-forget with last-writer-wins semantics. Loading is lenient:
//! a missing or unreadable snapshot falls back to a freshly initialized
//! session rather than failing startup.

use tracing::warn;

use crate::{
    catalog::CatalogData,
    game::{AlarmMessage, Game},
};

/// Storage seam for the serialized session snapshot
///
/// Implementations hold at most one snapshot; every save replaces the
/// previous one.
pub trait SnapshotStore {
    /// Stores the snapshot, replacing any previous one
    fn save(&mut self, snapshot: &str);

    /// Returns the stored snapshot, if one exists
    fn load(&self) -> Option<String>;
}

/// Serializes the session into the store
///
/// # Errors
///
/// Returns a [`serde_json::Error`] when serialization itself fails; the
/// store is not written in that case.
pub fn save_game<S: SnapshotStore>(game: &Game, store: &mut S) -> Result<(), serde_json::Error> {
    let snapshot = serde_json::to_string(game)?;
    store.save(&snapshot);
    Ok(())
}

/// Restores the session from the store, or starts a fresh one
///
/// An absent snapshot or one that no longer parses (a format change between
/// versions, say) is discarded with a warning and replaced by a fresh
/// session built from the catalog.
///
/// A snapshot can be taken while a delayed transition is still in flight
/// (the round switch, the finale settlement, a countdown tick); the restored
/// session re-derives those from state and re-schedules them through
/// `schedule`, so a restart never strands the session mid-transition.
///
/// # Errors
///
/// Returns a [`crate::catalog::Error`] only when the fallback itself cannot
/// be built from the catalog data.
pub fn load_game<S, N, I, F>(
    store: &S,
    catalog: &CatalogData,
    player_names: I,
    rng: &mut fastrand::Rng,
    mut schedule: F,
) -> Result<Game, crate::catalog::Error>
where
    S: SnapshotStore,
    N: Into<String>,
    I: IntoIterator<Item = N>,
    F: FnMut(AlarmMessage, web_time::Duration),
{
    if let Some(snapshot) = store.load() {
        match serde_json::from_str::<Game>(&snapshot) {
            Ok(game) => {
                game.resume(&mut schedule);
                return Ok(game);
            }
            Err(error) => {
                warn!(%error, "discarding unreadable snapshot");
            }
        }
    }
    Game::new(catalog, player_names, rng)
}

/// In-memory [`SnapshotStore`], for tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<String>,
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &str) {
        self.snapshot = Some(snapshot.to_string());
    }

    fn load(&self) -> Option<String> {
        self.snapshot.clone()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::catalog::{BoardRound, tests::sample_catalog};
    use crate::ledger::Id;
    use crate::redirect::RedirectState;

    const NAMES: [&str; 2] = ["Alice", "Bella"];

    fn fresh_game(seed: u64) -> Game {
        let mut rng = fastrand::Rng::with_seed(seed);
        Game::new(&sample_catalog(), NAMES, &mut rng).unwrap()
    }

    fn no_schedule(_: AlarmMessage, _: web_time::Duration) {}

    #[test]
    fn test_snapshot_round_trip_preserves_state() {
        let mut game = fresh_game(3);
        game.select_player(Id::new(2)).unwrap();
        let (theme_index, question_index) = game
            .board()
            .themes
            .iter()
            .enumerate()
            .flat_map(|(theme_index, theme)| {
                theme
                    .questions
                    .iter()
                    .enumerate()
                    .map(move |(question_index, question)| (theme_index, question_index, question))
            })
            .find(|(_, _, question)| !question.hidden)
            .map(|(theme_index, question_index, _)| (theme_index, question_index))
            .unwrap();
        game.select_question(theme_index, question_index).unwrap();
        let current = game.current_question().unwrap();
        game.award_points(Id::new(2), current.point_value).unwrap();

        let mut store = MemoryStore::default();
        save_game(&game, &mut store).unwrap();

        let mut rng = fastrand::Rng::with_seed(7);
        let restored = load_game(&store, &sample_catalog(), NAMES, &mut rng, no_schedule).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_missing_snapshot_builds_fresh_game() {
        let store = MemoryStore::default();
        let mut rng = fastrand::Rng::with_seed(3);
        let loaded = load_game(&store, &sample_catalog(), NAMES, &mut rng, no_schedule).unwrap();
        assert_eq!(loaded, fresh_game(3), "the fallback uses the caller's rng");
    }

    #[test]
    fn test_unreadable_snapshot_falls_back_to_fresh_game() {
        let mut store = MemoryStore::default();
        store.save("{ not json");
        let mut rng = fastrand::Rng::with_seed(3);
        let loaded = load_game(&store, &sample_catalog(), NAMES, &mut rng, no_schedule).unwrap();
        assert_eq!(loaded, fresh_game(3));
    }

    /// Answers every round 1 question, resolving redirects as they come up.
    fn finish_round_one(game: &mut Game) {
        loop {
            let next = game
                .board()
                .themes
                .iter()
                .enumerate()
                .filter(|(_, theme)| theme.round == BoardRound::One)
                .flat_map(|(theme_index, theme)| {
                    theme
                        .questions
                        .iter()
                        .enumerate()
                        .map(move |(question_index, question)| {
                            (theme_index, question_index, question.answered)
                        })
                })
                .find(|(_, _, answered)| !answered)
                .map(|(theme_index, question_index, _)| (theme_index, question_index));
            let Some((theme_index, question_index)) = next else {
                break;
            };

            game.select_question(theme_index, question_index).unwrap();
            if game.redirect().is_some_and(RedirectState::awaiting) {
                let original = game.redirect().unwrap().original_player;
                let target = game
                    .roster()
                    .players()
                    .iter()
                    .map(|player| player.id)
                    .find(|candidate| Some(*candidate) != original)
                    .unwrap();
                game.choose_redirect_target(target).unwrap();
            }
            // Dropping the scheduled alarms simulates the process dying
            // before they fire.
            game.close_question(no_schedule);
        }
    }

    #[test]
    fn test_restore_rearms_pending_round_advance() {
        let mut game = fresh_game(3);
        finish_round_one(&mut game);
        assert!(game.round_complete(BoardRound::One));
        assert_eq!(game.round(), crate::game::Round::One);

        let mut store = MemoryStore::default();
        save_game(&game, &mut store).unwrap();

        let mut alarms = Vec::new();
        let mut rng = fastrand::Rng::with_seed(9);
        let mut restored = load_game(&store, &sample_catalog(), NAMES, &mut rng, |message, _| {
            alarms.push(message);
        })
        .unwrap();
        assert_eq!(alarms, vec![AlarmMessage::AdvanceRound]);

        for message in alarms {
            restored.receive_alarm(message, no_schedule);
        }
        assert_eq!(restored.round(), crate::game::Round::Two);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let mut store = MemoryStore::default();
        let first = fresh_game(1);
        let mut second = fresh_game(2);
        second.select_player(Id::new(1)).unwrap();

        save_game(&first, &mut store).unwrap();
        save_game(&second, &mut store).unwrap();

        let mut rng = fastrand::Rng::with_seed(4);
        let loaded = load_game(&store, &sample_catalog(), NAMES, &mut rng, no_schedule).unwrap();
        assert_eq!(loaded, second);
    }
}
