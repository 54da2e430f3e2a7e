use super::deck::Deck;
use super::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Hidden,
    /// Face up while waiting for the pending match check.
    Revealed,
    Matched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub value: u32,
    pub state: CellState,
}

impl Cell {
    pub fn is_face_up(&self) -> bool {
        self.state != CellState::Hidden
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn from_deck(rows: usize, cols: usize, deck: &Deck) -> Result<Self, GameError> {
        let expected = rows * cols;
        if deck.len() != expected {
            return Err(GameError::DeckSize {
                expected,
                actual: deck.len(),
            });
        }
        Ok(Self::dealt(rows, cols, deck))
    }

    /// Lays the deck out face down; callers guarantee `deck.len() == rows * cols`.
    pub(crate) fn dealt(rows: usize, cols: usize, deck: &Deck) -> Self {
        let cells = deck
            .values()
            .iter()
            .map(|&value| Cell {
                value,
                state: CellState::Hidden,
            })
            .collect();
        Board { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn index_of(&self, row: usize, col: usize) -> Result<usize, GameError> {
        if row >= self.rows || col >= self.cols {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(row * self.cols + col)
    }

    pub fn position_of(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index_of(row, col).ok().map(|idx| &self.cells[idx])
    }

    pub fn cell_at(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn set_state(&mut self, row: usize, col: usize, state: CellState) -> Result<(), GameError> {
        let idx = self.index_of(row, col)?;
        self.cells[idx].state = state;
        Ok(())
    }

    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (self.position_of(idx), cell))
    }

    pub fn all_matched(&self) -> bool {
        self.cells.iter().all(|cell| cell.state == CellState::Matched)
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| cell.state == state).count()
    }
}
