use std::time::{Duration, Instant};

use memory_puzzle::game::{
    CellState, Difficulty, MatchOutcome, Phase, RevealOutcome, Session, TickOutcome,
    TIME_LIMIT_SECS,
};

fn value_at(session: &Session, row: usize, col: usize) -> u32 {
    session.board().cell(row, col).map(|cell| cell.value).unwrap()
}

fn find_cell(session: &Session, skip: (usize, usize), wanted: impl Fn(u32) -> bool) -> (usize, usize) {
    session
        .board()
        .cells()
        .find(|&(pos, cell)| pos != skip && wanted(cell.value))
        .map(|(pos, _)| pos)
        .unwrap()
}

#[test]
fn easy_game_end_to_end() {
    let start = Instant::now();
    let mut session = Session::new(Difficulty::Easy, 1, start);

    assert_eq!(session.board().rows(), 4);
    assert_eq!(session.board().cols(), 4);
    assert_eq!(session.board().count(CellState::Hidden), 16);
    assert_eq!(session.remaining_secs(start), TIME_LIMIT_SECS);

    let first = value_at(&session, 0, 0);
    assert_eq!(session.reveal(0, 0), RevealOutcome::Revealed { value: first });
    assert_eq!(session.board().cell(0, 0).unwrap().state, CellState::Revealed);

    // A cell holding a different value: the pair flips back after the check.
    let other = find_cell(&session, (0, 0), |value| value != first);
    assert!(matches!(session.reveal(other.0, other.1), RevealOutcome::PairPending { .. }));
    assert!(matches!(session.check_match(1), MatchOutcome::Mismatched { .. }));
    assert_eq!(session.board().cell(0, 0).unwrap().state, CellState::Hidden);
    assert_eq!(session.board().cell(other.0, other.1).unwrap().state, CellState::Hidden);

    // Now the real partner.
    let partner = find_cell(&session, (0, 0), |value| value == first);
    session.reveal(0, 0);
    assert_eq!(
        session.reveal(partner.0, partner.1),
        RevealOutcome::PairPending { value: first }
    );
    assert_eq!(
        session.check_match(1),
        MatchOutcome::Matched {
            cells: [(0, 0), partner],
            stage_won: false
        }
    );
    assert_eq!(session.board().cell(0, 0).unwrap().state, CellState::Matched);
    assert_eq!(session.board().cell(partner.0, partner.1).unwrap().state, CellState::Matched);
    assert!(session.selection().is_empty());
}

#[test]
fn clearing_every_pair_wins_and_replays_same_difficulty() {
    let start = Instant::now();
    let mut session = Session::new(Difficulty::Medium, 3, start);

    let mut last = MatchOutcome::Idle;
    loop {
        let next_hidden = session
            .board()
            .cells()
            .find(|(_, cell)| cell.state == CellState::Hidden)
            .map(|(pos, cell)| (pos, *cell));
        let Some(((row, col), cell)) = next_hidden else {
            break;
        };
        let partner = find_cell(&session, (row, col), |value| value == cell.value);
        session.reveal(row, col);
        session.reveal(partner.0, partner.1);
        last = session.check_match(3);
    }

    assert!(matches!(last, MatchOutcome::Matched { stage_won: true, .. }));
    assert_eq!(session.phase(), Phase::Won);

    let next = session.next_stage(4, start + Duration::from_secs(20));
    assert_eq!(next.difficulty(), Difficulty::Medium);
    assert_eq!(next.stage(), 2);
    assert_eq!(next.board().count(CellState::Hidden), 36);
    assert_eq!(next.phase(), Phase::Playing);
}

#[test]
fn timer_runs_out_after_sixty_seconds() {
    let start = Instant::now();
    let mut session = Session::new(Difficulty::Hard, 1, start);

    assert_eq!(
        session.tick(start + Duration::from_secs(59)),
        TickOutcome::Running { remaining: 1 }
    );
    assert_eq!(session.reveal(0, 0), RevealOutcome::Revealed { value: value_at(&session, 0, 0) });

    assert_eq!(session.tick(start + Duration::from_secs(60)), TickOutcome::TimedOut);
    assert_eq!(session.reveal(7, 7), RevealOutcome::Ignored);
    assert_eq!(session.tick(start + Duration::from_secs(61)), TickOutcome::TimedOut);
}

#[test]
fn check_scheduled_for_previous_board_is_ignored() {
    let start = Instant::now();
    let mut old = Session::new(Difficulty::Easy, 1, start);
    old.reveal(0, 0);
    old.reveal(0, 1);

    let mut replacement = Session::new(Difficulty::Easy, 2, start);
    replacement.reveal(1, 1);
    replacement.reveal(1, 2);

    assert_eq!(replacement.check_match(old.generation()), MatchOutcome::Stale);
    assert_eq!(replacement.board().count(CellState::Revealed), 2);
}
