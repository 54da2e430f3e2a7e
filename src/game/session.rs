use std::time::{Duration, Instant};

use rand::Rng;

use super::board::{Board, CellState};
use super::deck::Deck;
use super::difficulty::Difficulty;
use super::error::GameError;

pub const TIME_LIMIT_SECS: u64 = 60;
pub const MATCH_CHECK_DELAY: Duration = Duration::from_secs(1);
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Misclick: the cell is not hidden, a pair is pending, or the game is over.
    Ignored,
    Revealed { value: u32 },
    /// Second card of the pair is up; a match check must be scheduled.
    PairPending { value: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Scheduled for a board that has since been replaced.
    Stale,
    /// Nothing to compare.
    Idle,
    Matched {
        cells: [(usize, usize); 2],
        stage_won: bool,
    },
    Mismatched {
        cells: [(usize, usize); 2],
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: u64 },
    TimedOut,
}

/// One board at one difficulty, from deal to win or timeout.
#[derive(Clone, Debug)]
pub struct Session {
    difficulty: Difficulty,
    generation: u64,
    stage: u32,
    board: Board,
    selection: Vec<(usize, usize)>,
    started_at: Instant,
    phase: Phase,
}

impl Session {
    pub fn new(difficulty: Difficulty, generation: u64, now: Instant) -> Self {
        let mut rng = rand::rng();
        Self::with_rng(difficulty, generation, now, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        difficulty: Difficulty,
        generation: u64,
        now: Instant,
        rng: &mut R,
    ) -> Self {
        let (rows, cols) = difficulty.config();
        let deck = Deck::shuffled(difficulty, rng);
        Self::from_board(difficulty, generation, 1, now, Board::dealt(rows, cols, &deck))
    }

    pub fn with_deck(
        difficulty: Difficulty,
        deck: &Deck,
        generation: u64,
        now: Instant,
    ) -> Result<Self, GameError> {
        let (rows, cols) = difficulty.config();
        let board = Board::from_deck(rows, cols, deck)?;
        Ok(Self::from_board(difficulty, generation, 1, now, board))
    }

    fn from_board(
        difficulty: Difficulty,
        generation: u64,
        stage: u32,
        now: Instant,
        board: Board,
    ) -> Self {
        Session {
            difficulty,
            generation,
            stage,
            board,
            selection: Vec::with_capacity(2),
            started_at: now,
            phase: Phase::Playing,
        }
    }

    /// Fresh shuffle at the same difficulty, one stage further.
    pub fn next_stage(&self, generation: u64, now: Instant) -> Self {
        let mut next = Self::new(self.difficulty, generation, now);
        next.stage = self.stage.saturating_add(1);
        next
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> &[(usize, usize)] {
        &self.selection
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }

    pub fn reveal(&mut self, row: usize, col: usize) -> RevealOutcome {
        if self.phase != Phase::Playing || self.selection.len() >= 2 {
            return RevealOutcome::Ignored;
        }
        let value = match self.board.cell(row, col) {
            Some(cell) if cell.state == CellState::Hidden => cell.value,
            _ => return RevealOutcome::Ignored,
        };
        if self.board.set_state(row, col, CellState::Revealed).is_err() {
            return RevealOutcome::Ignored;
        }
        self.selection.push((row, col));
        if self.selection.len() == 2 {
            RevealOutcome::PairPending { value }
        } else {
            RevealOutcome::Revealed { value }
        }
    }

    /// Resolves the pending pair. `generation` is the one the check was scheduled for.
    pub fn check_match(&mut self, generation: u64) -> MatchOutcome {
        if generation != self.generation {
            return MatchOutcome::Stale;
        }
        if self.phase != Phase::Playing {
            return MatchOutcome::Idle;
        }
        let cells = match self.selection.as_slice() {
            &[first, second] => [first, second],
            _ => return MatchOutcome::Idle,
        };
        let [(r1, c1), (r2, c2)] = cells;
        let (Some(first), Some(second)) = (self.board.cell(r1, c1), self.board.cell(r2, c2))
        else {
            self.selection.clear();
            return MatchOutcome::Idle;
        };
        let matched = first.value == second.value;
        let next_state = if matched {
            CellState::Matched
        } else {
            CellState::Hidden
        };
        for &(row, col) in &cells {
            // Coordinates came from `reveal`, which already bounds-checked them.
            let _ = self.board.set_state(row, col, next_state);
        }
        self.selection.clear();

        if !matched {
            return MatchOutcome::Mismatched { cells };
        }
        let stage_won = self.board.all_matched();
        if stage_won {
            self.phase = Phase::Won;
        }
        MatchOutcome::Matched { cells, stage_won }
    }

    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs();
        TIME_LIMIT_SECS.saturating_sub(elapsed)
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.phase == Phase::TimedOut {
            return TickOutcome::TimedOut;
        }
        let remaining = self.remaining_secs(now);
        if self.phase == Phase::Playing && remaining == 0 {
            self.phase = Phase::TimedOut;
            return TickOutcome::TimedOut;
        }
        TickOutcome::Running { remaining }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ordered Easy deck: row 0 = 1 2 3 4, row 1 = 5 6 7 8, rows 2-3 repeat them.
    fn easy_session(now: Instant) -> Session {
        Session::with_deck(Difficulty::Easy, &Deck::ordered(Difficulty::Easy), 7, now).unwrap()
    }

    fn match_pair(session: &mut Session, a: (usize, usize), b: (usize, usize)) -> MatchOutcome {
        assert!(matches!(session.reveal(a.0, a.1), RevealOutcome::Revealed { .. }));
        assert!(matches!(session.reveal(b.0, b.1), RevealOutcome::PairPending { .. }));
        session.check_match(session.generation())
    }

    #[test]
    fn new_session_starts_hidden_with_full_time() {
        let now = Instant::now();
        let session = Session::new(Difficulty::Medium, 1, now);
        assert_eq!(session.board().len(), 36);
        assert_eq!(session.board().count(CellState::Hidden), 36);
        assert!(session.selection().is_empty());
        assert_eq!(session.stage(), 1);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.remaining_secs(now), TIME_LIMIT_SECS);
    }

    #[test]
    fn reveal_shows_value_and_tracks_selection() {
        let mut session = easy_session(Instant::now());
        assert_eq!(session.reveal(0, 2), RevealOutcome::Revealed { value: 3 });
        assert_eq!(session.board().cell(0, 2).unwrap().state, CellState::Revealed);
        assert_eq!(session.selection(), &[(0, 2)]);
        assert_eq!(session.reveal(1, 0), RevealOutcome::PairPending { value: 5 });
        assert_eq!(session.selection(), &[(0, 2), (1, 0)]);
    }

    #[test]
    fn reveal_ignores_misclicks() {
        let mut session = easy_session(Instant::now());
        session.reveal(0, 0);
        assert_eq!(session.reveal(0, 0), RevealOutcome::Ignored);
        assert_eq!(session.reveal(9, 0), RevealOutcome::Ignored);

        session.reveal(0, 1);
        assert_eq!(session.reveal(0, 2), RevealOutcome::Ignored);
        assert_eq!(session.board().cell(0, 2).unwrap().state, CellState::Hidden);
        assert_eq!(session.selection().len(), 2);
    }

    #[test]
    fn reveal_ignores_matched_cells() {
        let mut session = easy_session(Instant::now());
        match_pair(&mut session, (0, 0), (2, 0));
        assert_eq!(session.reveal(2, 0), RevealOutcome::Ignored);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn equal_values_become_matched() {
        let mut session = easy_session(Instant::now());
        let outcome = match_pair(&mut session, (0, 0), (2, 0));
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                cells: [(0, 0), (2, 0)],
                stage_won: false
            }
        );
        assert_eq!(session.board().cell(0, 0).unwrap().state, CellState::Matched);
        assert_eq!(session.board().cell(2, 0).unwrap().state, CellState::Matched);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn unequal_values_flip_back() {
        let mut session = easy_session(Instant::now());
        let outcome = match_pair(&mut session, (0, 0), (0, 1));
        assert_eq!(
            outcome,
            MatchOutcome::Mismatched {
                cells: [(0, 0), (0, 1)]
            }
        );
        assert_eq!(session.board().count(CellState::Hidden), 16);
        assert!(session.selection().is_empty());
        assert_eq!(session.reveal(0, 0), RevealOutcome::Revealed { value: 1 });
    }

    #[test]
    fn check_without_pair_is_idle() {
        let mut session = easy_session(Instant::now());
        assert_eq!(session.check_match(7), MatchOutcome::Idle);
        session.reveal(1, 1);
        assert_eq!(session.check_match(7), MatchOutcome::Idle);
        assert_eq!(session.selection(), &[(1, 1)]);
    }

    #[test]
    fn stale_check_leaves_board_alone() {
        let mut session = easy_session(Instant::now());
        session.reveal(0, 0);
        session.reveal(2, 0);
        assert_eq!(session.check_match(6), MatchOutcome::Stale);
        assert_eq!(session.board().count(CellState::Revealed), 2);
        assert_eq!(session.selection().len(), 2);
    }

    #[test]
    fn last_pair_wins_the_stage() {
        let mut session = easy_session(Instant::now());
        for col in 0..4 {
            for row in 0..2 {
                if (row, col) == (1, 3) {
                    continue;
                }
                let outcome = match_pair(&mut session, (row, col), (row + 2, col));
                assert!(matches!(outcome, MatchOutcome::Matched { stage_won: false, .. }));
            }
        }
        // Exactly one unmatched pair left.
        assert_eq!(session.board().count(CellState::Hidden), 2);
        assert!(!session.is_won());

        let outcome = match_pair(&mut session, (1, 3), (3, 3));
        assert!(matches!(outcome, MatchOutcome::Matched { stage_won: true, .. }));
        assert!(session.board().all_matched());
        assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn tick_counts_down_then_times_out() {
        let start = Instant::now();
        let mut session = easy_session(start);
        assert_eq!(
            session.tick(start + Duration::from_secs(1)),
            TickOutcome::Running { remaining: 59 }
        );
        assert_eq!(
            session.tick(start + Duration::from_millis(59_900)),
            TickOutcome::Running { remaining: 1 }
        );
        assert_eq!(session.phase(), Phase::Playing);

        assert_eq!(session.tick(start + Duration::from_secs(60)), TickOutcome::TimedOut);
        assert_eq!(session.phase(), Phase::TimedOut);
        assert_eq!(session.reveal(0, 0), RevealOutcome::Ignored);
    }

    #[test]
    fn timeout_freezes_pending_pair() {
        let start = Instant::now();
        let mut session = easy_session(start);
        session.reveal(0, 0);
        session.reveal(2, 0);
        assert_eq!(session.tick(start + Duration::from_secs(75)), TickOutcome::TimedOut);
        assert_eq!(session.check_match(7), MatchOutcome::Idle);
        assert_eq!(session.board().count(CellState::Matched), 0);
    }

    #[test]
    fn next_stage_reshuffles_at_same_difficulty() {
        let start = Instant::now();
        let mut session = easy_session(start);
        match_pair(&mut session, (0, 0), (2, 0));

        let later = start + Duration::from_secs(30);
        let next = session.next_stage(8, later);
        assert_eq!(next.difficulty(), Difficulty::Easy);
        assert_eq!(next.stage(), 2);
        assert_eq!(next.generation(), 8);
        assert_eq!(next.board().count(CellState::Hidden), 16);
        assert_eq!(next.remaining_secs(later), TIME_LIMIT_SECS);
    }
}
