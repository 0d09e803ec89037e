//! Question catalog loading and the runtime board
//!
//! This module parses the static catalog data (themes with their questions
//! plus the separate finale theme list), validates its shape, normalizes the
//! union-shaped answers into a single tagged form, and builds the runtime
//! [`Board`] used by the game state machine. Building a board assigns a fixed
//! quota of hidden (redirect) questions per round, drawn uniformly at random
//! without replacement; a fresh draw happens on every full reset.
//!
//! Malformed catalog data is a fatal startup condition: the loader refuses to
//! produce a board rather than guessing at the intended shape.

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use crate::constants;

/// Errors raised while loading the catalog
///
/// All of these are unrecoverable for the load in question; the caller
/// should refuse startup instead of continuing with a partial board.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog JSON could not be parsed at all
    #[error("failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    /// The catalog parsed but violated a structural constraint
    #[error("malformed catalog: {0}")]
    Invalid(#[from] garde::Report),
    /// One of the two board rounds has no themes at all
    #[error("no themes declared for round {round}")]
    EmptyRound {
        /// The round missing from the catalog
        round: u8,
    },
}

/// The kind of media attached to a question or answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A still image
    Image,
    /// A video clip
    Video,
}

/// Media content attached to a question or answer
///
/// The source is an opaque path or URL; resolving and rendering it is the
/// view layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Whether the source is an image or a video
    pub kind: MediaKind,
    /// Path or URL of the media asset
    pub src: String,
}

/// Raw media entry as it appears in the catalog data
///
/// The catalog allows both fields to be null; only entries with a kind and a
/// source survive normalization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MediaData {
    /// Media kind, if any
    #[serde(rename = "type")]
    #[garde(skip)]
    pub kind: Option<MediaKind>,
    /// Media source, if any
    #[garde(skip)]
    pub src: Option<String>,
}

impl MediaData {
    /// Normalizes a raw media entry, dropping incomplete ones
    fn normalize(self) -> Option<Media> {
        match (self.kind, self.src) {
            (Some(kind), Some(src)) => Some(Media { kind, src }),
            _ => None,
        }
    }
}

/// An answer in its normalized form: text plus optional media
///
/// The catalog allows answers as either a plain string or a structured
/// object; both collapse into this shape at load time so nothing downstream
/// needs to discriminate between the two.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text read out by the presenter
    pub text: String,
    /// Optional media revealed alongside the answer
    pub media: Option<Media>,
}

/// Raw answer as it appears in the catalog data
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnswerData {
    /// A bare answer string
    Text(String),
    /// A structured answer with optional media
    Full {
        /// The answer text
        text: String,
        /// Optional media shown with the answer
        media: Option<MediaData>,
    },
}

impl AnswerData {
    /// Collapses the union shape into the normalized [`Answer`]
    fn normalize(self) -> Answer {
        match self {
            Self::Text(text) => Answer { text, media: None },
            Self::Full { text, media } => Answer {
                text,
                media: media.and_then(MediaData::normalize),
            },
        }
    }
}

/// Raw question entry in a board theme
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionData {
    /// Question text shown to the players
    #[garde(length(min = 1, max = constants::board::MAX_TEXT_LENGTH))]
    pub text: String,
    /// Optional media shown with the question
    #[garde(dive)]
    pub media: Option<MediaData>,
    /// The answer, as a string or structured object
    #[garde(skip)]
    pub answer: AnswerData,
}

/// Raw theme entry for one of the two board rounds
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ThemeData {
    /// Theme name, unique within its round
    #[garde(length(min = 1, max = constants::board::MAX_THEME_NAME_LENGTH))]
    pub name: String,
    /// The round this theme belongs to (1 or 2)
    #[garde(range(min = 1, max = 2))]
    pub round: u8,
    /// The questions of this theme, cheapest first
    #[garde(length(equal = constants::board::QUESTIONS_PER_THEME), dive)]
    pub questions: Vec<QuestionData>,
}

/// Raw finale theme entry: a single question behind a theme name
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuperGameThemeData {
    /// Finale theme name, unique within the finale list
    #[garde(length(min = 1, max = constants::board::MAX_THEME_NAME_LENGTH))]
    pub name: String,
    /// The single question of this finale theme
    #[garde(length(min = 1, max = constants::board::MAX_TEXT_LENGTH))]
    pub question: String,
    /// Optional media shown with the question
    #[garde(dive)]
    pub media: Option<MediaData>,
    /// The answer, as a string or structured object
    #[garde(skip)]
    pub answer: AnswerData,
}

/// Raw finale section of the catalog
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuperGameData {
    /// The finale theme list
    #[garde(length(min = constants::super_game::MIN_THEMES), dive)]
    pub themes: Vec<SuperGameThemeData>,
}

/// The complete raw catalog: board themes plus the finale list
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CatalogData {
    /// Themes for both board rounds
    #[garde(length(min = 1), dive)]
    pub themes: Vec<ThemeData>,
    /// The finale section
    #[serde(rename = "superGame")]
    #[garde(dive)]
    pub super_game: SuperGameData,
}

impl CatalogData {
    /// Parses and validates catalog data from its JSON form
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for syntactically invalid JSON and
    /// [`Error::Invalid`] when the parsed data violates the catalog shape.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }
}

/// One of the two main board rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardRound {
    /// Round 1: the 100-500 point scale
    One,
    /// Round 2: the 200-1000 point scale
    Two,
}

impl BoardRound {
    /// Returns the point values of this round, indexed by question position
    pub fn points(self) -> [i64; constants::board::QUESTIONS_PER_THEME] {
        match self {
            Self::One => constants::board::ROUND_ONE_POINTS,
            Self::Two => constants::board::ROUND_TWO_POINTS,
        }
    }

    fn from_data(round: u8) -> Self {
        if round == 1 { Self::One } else { Self::Two }
    }
}

/// A question on the runtime board
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier unique within the catalog (theme name plus position)
    pub id: String,
    /// Question text
    pub text: String,
    /// Optional question media
    pub media: Option<Media>,
    /// The normalized answer
    pub answer: Answer,
    /// Whether this question has been played; flips false to true exactly
    /// once per session
    pub answered: bool,
    /// Whether selecting this question triggers the redirect sub-flow
    pub hidden: bool,
}

/// A theme of five questions on the runtime board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name, unique within its round
    pub name: String,
    /// The round this theme belongs to
    pub round: BoardRound,
    /// The five questions, cheapest first
    pub questions: Vec<Question>,
}

/// A finale theme: one name, one question, one answer
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinaleTheme {
    /// Finale theme name, unique within the finale list
    pub name: String,
    /// The question text
    pub question: String,
    /// Optional question media
    pub media: Option<Media>,
    /// The normalized answer
    pub answer: Answer,
}

/// The runtime question board for a session
///
/// Owns the themes of both rounds and the finale theme list. Built once at
/// startup and rebuilt (with a fresh hidden-question draw) on every reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Themes of both board rounds
    pub themes: Vec<Theme>,
    /// Finale themes for the super game
    pub finale: Vec<FinaleTheme>,
}

impl Board {
    /// Builds the runtime board from validated catalog data
    ///
    /// Every question starts unanswered, and exactly
    /// [`constants::board::HIDDEN_PER_ROUND`] questions per round are marked
    /// hidden, drawn independently per round.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invalid`] when the data violates the catalog shape
    /// and [`Error::EmptyRound`] when either round has no themes.
    pub fn from_catalog(data: &CatalogData, rng: &mut fastrand::Rng) -> Result<Self, Error> {
        data.validate()?;

        for round in [1, 2] {
            if !data.themes.iter().any(|theme| theme.round == round) {
                return Err(Error::EmptyRound { round });
            }
        }

        let themes = data
            .themes
            .iter()
            .map(|theme| Theme {
                name: theme.name.clone(),
                round: BoardRound::from_data(theme.round),
                questions: theme
                    .questions
                    .iter()
                    .enumerate()
                    .map(|(index, question)| Question {
                        id: format!("{}-{index}", theme.name),
                        text: question.text.clone(),
                        media: question.media.clone().and_then(MediaData::normalize),
                        answer: question.answer.clone().normalize(),
                        answered: false,
                        hidden: false,
                    })
                    .collect(),
            })
            .collect();

        let finale = data
            .super_game
            .themes
            .iter()
            .map(|theme| FinaleTheme {
                name: theme.name.clone(),
                question: theme.question.clone(),
                media: theme.media.clone().and_then(MediaData::normalize),
                answer: theme.answer.clone().normalize(),
            })
            .collect();

        let mut board = Self { themes, finale };
        board.assign_hidden(rng);
        Ok(board)
    }

    /// Clears all answered flags and redraws the hidden questions
    ///
    /// Used by the full game reset; the board content itself is unchanged.
    pub fn reset(&mut self, rng: &mut fastrand::Rng) {
        for theme in &mut self.themes {
            for question in &mut theme.questions {
                question.answered = false;
                question.hidden = false;
            }
        }
        self.assign_hidden(rng);
    }

    /// Marks the per-round hidden question quota, uniformly without
    /// replacement within each round
    fn assign_hidden(&mut self, rng: &mut fastrand::Rng) {
        for round in [BoardRound::One, BoardRound::Two] {
            let coordinates: Vec<(usize, usize)> = self
                .themes
                .iter()
                .enumerate()
                .filter(|(_, theme)| theme.round == round)
                .flat_map(|(theme_index, theme)| {
                    (0..theme.questions.len()).map(move |question_index| (theme_index, question_index))
                })
                .collect();

            for (theme_index, question_index) in
                rng.choose_multiple(coordinates.into_iter(), constants::board::HIDDEN_PER_ROUND)
            {
                self.themes[theme_index].questions[question_index].hidden = true;
            }
        }
    }

    /// Looks up a question by board coordinates
    pub fn question(&self, theme_index: usize, question_index: usize) -> Option<&Question> {
        self.themes.get(theme_index)?.questions.get(question_index)
    }

    /// Looks up a question mutably by board coordinates
    pub fn question_mut(
        &mut self,
        theme_index: usize,
        question_index: usize,
    ) -> Option<&mut Question> {
        self.themes
            .get_mut(theme_index)?
            .questions
            .get_mut(question_index)
    }

    /// Returns the point value of a question from the fixed per-round table
    pub fn point_value(&self, theme_index: usize, question_index: usize) -> Option<i64> {
        let theme = self.themes.get(theme_index)?;
        theme.round.points().get(question_index).copied()
    }

    /// Checks whether every question of the given round has been answered
    pub fn round_complete(&self, round: BoardRound) -> bool {
        self.themes
            .iter()
            .filter(|theme| theme.round == round)
            .all(|theme| theme.questions.iter().all(|question| question.answered))
    }

    /// Counts the hidden questions of a round; the quota invariant for tests
    /// and sanity displays
    pub fn hidden_count(&self, round: BoardRound) -> usize {
        self.themes
            .iter()
            .filter(|theme| theme.round == round)
            .flat_map(|theme| &theme.questions)
            .filter(|question| question.hidden)
            .count()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use super::*;

    /// A small but fully valid catalog: two themes per round, four finale
    /// themes. Shared by the game and persistence tests.
    pub(crate) fn sample_catalog() -> CatalogData {
        let theme = |name: &str, round: u8| ThemeData {
            name: name.to_string(),
            round,
            questions: (0..5)
                .map(|i| QuestionData {
                    text: format!("{name} question {i}"),
                    media: None,
                    answer: AnswerData::Text(format!("{name} answer {i}")),
                })
                .collect(),
        };

        CatalogData {
            themes: vec![
                theme("History", 1),
                theme("Movies", 1),
                theme("Science", 2),
                theme("Music", 2),
            ],
            super_game: SuperGameData {
                themes: ["Space", "Oceans", "Inventions", "Legends"]
                    .into_iter()
                    .map(|name| SuperGameThemeData {
                        name: name.to_string(),
                        question: format!("{name} finale question"),
                        media: None,
                        answer: AnswerData::Text(format!("{name} finale answer")),
                    })
                    .collect(),
            },
        }
    }

    pub(crate) fn sample_board(seed: u64) -> Board {
        let mut rng = fastrand::Rng::with_seed(seed);
        Board::from_catalog(&sample_catalog(), &mut rng).unwrap()
    }

    #[test]
    fn test_point_tables_match_fixed_values() {
        assert_eq!(BoardRound::One.points(), [100, 200, 300, 400, 500]);
        assert_eq!(BoardRound::Two.points(), [200, 400, 600, 800, 1000]);
    }

    #[test]
    fn test_board_point_value_uses_theme_round() {
        let board = sample_board(1);
        assert_eq!(board.point_value(0, 0), Some(100));
        assert_eq!(board.point_value(1, 4), Some(500));
        assert_eq!(board.point_value(2, 0), Some(200));
        assert_eq!(board.point_value(3, 4), Some(1000));
        assert_eq!(board.point_value(0, 5), None);
        assert_eq!(board.point_value(9, 0), None);
    }

    #[test]
    fn test_exactly_two_hidden_per_round() {
        for seed in 0..20 {
            let board = sample_board(seed);
            assert_eq!(board.hidden_count(BoardRound::One), 2, "seed {seed}");
            assert_eq!(board.hidden_count(BoardRound::Two), 2, "seed {seed}");
        }
    }

    #[test]
    fn test_reset_redraws_hidden_but_keeps_quota() {
        let mut board = sample_board(3);
        let before: Vec<String> = board
            .themes
            .iter()
            .flat_map(|t| &t.questions)
            .filter(|q| q.hidden)
            .map(|q| q.id.clone())
            .collect();

        // A different stream makes an identical draw overwhelmingly unlikely.
        let mut rng = fastrand::Rng::with_seed(12345);
        board.reset(&mut rng);

        let after: Vec<String> = board
            .themes
            .iter()
            .flat_map(|t| &t.questions)
            .filter(|q| q.hidden)
            .map(|q| q.id.clone())
            .collect();

        assert_eq!(board.hidden_count(BoardRound::One), 2);
        assert_eq!(board.hidden_count(BoardRound::Two), 2);
        assert_ne!(before, after);
        assert!(
            board
                .themes
                .iter()
                .flat_map(|t| &t.questions)
                .all(|q| !q.answered)
        );
    }

    #[test]
    fn test_answer_normalization_collapses_union() {
        let data = CatalogData::from_json(
            r#"{
                "themes": [
                    {"name": "A", "round": 1, "questions": [
                        {"text": "q0", "answer": "plain"},
                        {"text": "q1", "answer": {"text": "rich", "media": {"type": "image", "src": "a.png"}}},
                        {"text": "q2", "answer": {"text": "bare"}},
                        {"text": "q3", "answer": "plain"},
                        {"text": "q4", "answer": {"text": "null media", "media": {"type": null, "src": null}}}
                    ]},
                    {"name": "B", "round": 2, "questions": [
                        {"text": "q0", "answer": "x"},
                        {"text": "q1", "answer": "x"},
                        {"text": "q2", "answer": "x"},
                        {"text": "q3", "answer": "x"},
                        {"text": "q4", "answer": "x"}
                    ]}
                ],
                "superGame": {"themes": [
                    {"name": "S1", "question": "f?", "answer": "fa"},
                    {"name": "S2", "question": "g?", "answer": {"text": "ga"}}
                ]}
            }"#,
        )
        .unwrap();

        let mut rng = fastrand::Rng::with_seed(7);
        let board = Board::from_catalog(&data, &mut rng).unwrap();

        let questions = &board.themes[0].questions;
        assert_eq!(questions[0].answer.text, "plain");
        assert_eq!(questions[0].answer.media, None);
        assert_eq!(questions[1].answer.text, "rich");
        assert_eq!(
            questions[1].answer.media,
            Some(Media {
                kind: MediaKind::Image,
                src: "a.png".to_string()
            })
        );
        assert_eq!(questions[2].answer.media, None);
        assert_eq!(questions[4].answer.media, None, "incomplete media is dropped");
        assert_eq!(board.finale[1].answer.text, "ga");
    }

    #[test]
    fn test_wrong_question_count_is_fatal() {
        let mut data = sample_catalog();
        data.themes[0].questions.pop();
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(matches!(
            Board::from_catalog(&data, &mut rng),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_out_of_range_round_is_fatal() {
        let mut data = sample_catalog();
        data.themes[0].round = 3;
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(matches!(
            Board::from_catalog(&data, &mut rng),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_round_is_fatal() {
        let mut data = sample_catalog();
        data.themes.retain(|theme| theme.round == 1);
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(matches!(
            Board::from_catalog(&data, &mut rng),
            Err(Error::EmptyRound { round: 2 })
        ));
    }

    #[test]
    fn test_too_few_finale_themes_is_fatal() {
        let mut data = sample_catalog();
        data.super_game.themes.truncate(1);
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(matches!(
            Board::from_catalog(&data, &mut rng),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_unparseable_catalog_is_fatal() {
        assert!(matches!(
            CatalogData::from_json("{not json"),
            Err(Error::Parse(_))
        ));
    }
}
