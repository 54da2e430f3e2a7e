//! Rules of the memory puzzle, independent of any widget toolkit.
//!
//! The UI owns a [`Session`] and turns its outcomes into widget updates; every
//! transition here takes its inputs (coordinates, the current instant, the
//! generation of a scheduled callback) explicitly so it can be driven from tests.

pub mod board;
pub mod deck;
pub mod difficulty;
pub mod error;
pub mod session;

pub use board::{Board, Cell, CellState};
pub use deck::Deck;
pub use difficulty::Difficulty;
pub use error::GameError;
pub use session::{
    MatchOutcome, Phase, RevealOutcome, Session, TickOutcome, MATCH_CHECK_DELAY, TICK_INTERVAL,
    TIME_LIMIT_SECS,
};
