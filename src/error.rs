use thiserror::Error;

/// Errors raised by the game core.
///
/// Construction errors (`EmptyWordList`, `EmptyLabelList`, `InvalidWord`,
/// `InvalidBudget`) prevent a session from starting. The others are local
/// caller contract violations and never change state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Guess input that is not a single lowercase ASCII letter
    #[error("invalid letter {0:?}: expected a single lowercase letter a-z")]
    InvalidLetter(String),

    /// Label lookup past the end of the language list
    #[error("label index {index} out of range for {len} labels")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("word list is empty")]
    EmptyWordList,

    #[error("language label list is empty")]
    EmptyLabelList,

    /// A configured word that is empty or not all lowercase ASCII letters
    #[error("invalid word {0:?}: words must be non-empty lowercase a-z")]
    InvalidWord(String),

    /// Wrong-guess budget below one or larger than the label list
    #[error("wrong-guess budget must be between 1 and the number of languages, got {0}")]
    InvalidBudget(usize),
}

pub type GameResult<T> = Result<T, GameError>;
