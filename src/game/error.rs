use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown difficulty level `{0}`")]
    UnknownDifficulty(String),

    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("deck holds {actual} cards but the board has {expected} cells")]
    DeckSize { expected: usize, actual: usize },
}
