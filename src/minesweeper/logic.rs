//! Minesweeper session logic: reveal, chording, flags, hints, win and loss.
//!
//! Cascades use an explicit stack so board size never limits recursion depth.

use rand::Rng;
use tracing::{debug, info};

use super::generation::place_mines;
use super::types::{GameEvent, GameStatus, HintOutcome, MinesweeperGame, RevealOutcome};
use crate::core::Result;

/// What one command opened.
#[derive(Debug, Default)]
struct Tally {
    opened: usize,
    mines: usize,
}

/// Reveal the cell at (row, col).
///
/// - The first reveal of a session places the mines, keeping this cell and its
///   neighbors clear.
/// - A pending hint redirects the reveal (see [`use_hint`]).
/// - On an open numbered cell this is a chord: when flags plus exploded mines
///   around it match its number, every other covered neighbor is revealed.
/// - Flagged and already-open cells are otherwise left alone.
/// - A zero cell flood-fills its covered, unflagged neighbors.
///
/// Commands after the game is over are ignored.
pub fn reveal<R: Rng>(
    game: &mut MinesweeperGame,
    row: usize,
    col: usize,
    rng: &mut R,
) -> Result<RevealOutcome> {
    if game.is_over() {
        return Ok(RevealOutcome::Ignored);
    }
    let index = game.board.index_of(row, col)?;

    if !game.board.mines_placed {
        place_mines(&mut game.board, row, col, rng)?;
    }
    game.status = GameStatus::InProgress;

    if game.hint_armed {
        return Ok(apply_hint(game, index));
    }

    let cell = game.board.cells[index];
    let mut tally = Tally::default();

    if cell.revealed && cell.adjacent_mines > 0 {
        chord(game, index, &mut tally);
    } else if cell.revealed || cell.flagged {
        return Ok(RevealOutcome::Ignored);
    } else {
        open_from(game, index, &mut tally);
    }

    Ok(finish_command(game, &tally))
}

/// Toggle the flag on a covered cell.
///
/// Returns whether the flag changed. Flags cannot be placed before the first
/// reveal, after the game ends, or on open cells.
pub fn toggle_flag(game: &mut MinesweeperGame, row: usize, col: usize) -> Result<bool> {
    if game.is_over() || !game.board.mines_placed {
        return Ok(false);
    }
    let index = game.board.index_of(row, col)?;
    let cell = &mut game.board.cells[index];

    if cell.revealed {
        return Ok(false);
    }

    cell.flagged = !cell.flagged;
    if cell.flagged {
        game.flagged_count += 1;
    } else {
        game.flagged_count -= 1;
    }
    Ok(true)
}

/// Spend a hint charge and arm a one-shot redirect for the next reveal.
///
/// The redirected reveal flags the target if it is a mine and opens it
/// otherwise. A target that is already open or flagged is rejected and the
/// redirect stays armed; the charge is not refunded.
pub fn use_hint(game: &mut MinesweeperGame) -> HintOutcome {
    if game.is_over() {
        return HintOutcome::Unavailable;
    }
    if game.hint_armed {
        return HintOutcome::AlreadyArmed;
    }
    if !game.hints.try_consume() {
        return HintOutcome::Exhausted;
    }
    game.hint_armed = true;
    debug!("Hint armed, {} remaining", game.hints.remaining());
    HintOutcome::Armed {
        remaining: game.hints.remaining(),
    }
}

/// Check the win condition and end the game if it holds.
///
/// Won when every safe cell is open and the error tolerance still holds, even
/// if some mines were revealed along the way.
pub fn check_win_condition(game: &mut MinesweeperGame) -> bool {
    if game.is_over() || !game.board.mines_placed {
        return false;
    }
    let safe_total = game.board.total_cells() - game.board.mine_actual;
    let safe_revealed = game.revealed_count - game.revealed_mine_count;

    if safe_revealed == safe_total && game.error_count < game.max_errors {
        game.status = GameStatus::Won;
        reveal_all(game, true);
        info!(
            "Board cleared with {} of {} errors",
            game.error_count, game.max_errors
        );
        return true;
    }
    false
}

/// Terminal display pass.
///
/// On a win every mine is shown flagged. On a loss every mine is shown and
/// flags on safe cells are marked wrong. Counters are left as they were at
/// the end of play, except the flag count after a win.
pub fn reveal_all(game: &mut MinesweeperGame, is_win: bool) {
    for cell in game.board.cells.iter_mut() {
        cell.wrong_flag = false;
        if cell.is_mine {
            cell.revealed = true;
            if is_win {
                cell.flagged = true;
            }
        } else if cell.flagged && !is_win {
            cell.wrong_flag = true;
            cell.revealed = true;
        }
    }
    if is_win {
        game.flagged_count = game.board.cells.iter().filter(|c| c.flagged).count();
    }
}

fn apply_hint(game: &mut MinesweeperGame, index: usize) -> RevealOutcome {
    let cell = game.board.cells[index];
    if cell.revealed || cell.flagged {
        debug!(
            "Hint rejected on ({}, {}): cell already resolved",
            cell.row, cell.col
        );
        return RevealOutcome::HintRejected;
    }

    game.hint_armed = false;

    if cell.is_mine {
        game.board.cells[index].flagged = true;
        game.flagged_count += 1;
        debug!("Hint flagged mine at ({}, {})", cell.row, cell.col);
        return RevealOutcome::HintFlagged;
    }

    let mut tally = Tally::default();
    open_from(game, index, &mut tally);
    finish_command(game, &tally)
}

/// Reveal every covered, unflagged neighbor of a satisfied numbered cell.
fn chord(game: &mut MinesweeperGame, index: usize, tally: &mut Tally) {
    let number = game.board.cells[index].adjacent_mines as usize;
    let neighbors = game.board.neighbor_indices(index);

    let accounted = neighbors
        .iter()
        .filter(|&&n| {
            let c = &game.board.cells[n];
            c.flagged || (c.revealed && c.is_mine)
        })
        .count();

    if accounted != number {
        return;
    }

    debug!(
        "Chording at ({}, {})",
        game.board.cells[index].row, game.board.cells[index].col
    );
    for n in neighbors {
        if game.is_over() {
            break;
        }
        let c = &game.board.cells[n];
        if !c.revealed && !c.flagged {
            open_from(game, n, tally);
        }
    }
}

/// Reveal `start` and flood-fill outward from zero cells.
fn open_from(game: &mut MinesweeperGame, start: usize, tally: &mut Tally) {
    let mut stack = vec![start];

    while let Some(index) = stack.pop() {
        if game.is_over() {
            break;
        }
        let cell = game.board.cells[index];
        if cell.revealed || cell.flagged {
            continue;
        }

        game.board.cells[index].revealed = true;
        game.revealed_count += 1;

        if cell.is_mine {
            hit_mine(game, index, tally);
            continue;
        }

        tally.opened += 1;
        if cell.adjacent_mines == 0 {
            for n in game.board.neighbor_indices(index) {
                let c = &game.board.cells[n];
                if !c.revealed && !c.flagged {
                    stack.push(n);
                }
            }
        }
    }
}

fn hit_mine(game: &mut MinesweeperGame, index: usize, tally: &mut Tally) {
    game.revealed_mine_count += 1;
    game.error_count += 1;
    tally.mines += 1;

    let cell = &game.board.cells[index];
    info!(
        "Mine revealed at ({}, {}): {} of {} errors",
        cell.row, cell.col, game.error_count, game.max_errors
    );

    if game.error_count >= game.max_errors {
        game.status = GameStatus::Lost;
        reveal_all(game, false);
        info!("Too many errors, sub-level lost");
    }
}

fn finish_command(game: &mut MinesweeperGame, tally: &Tally) -> RevealOutcome {
    if game.status == GameStatus::Lost {
        return RevealOutcome::Finished(GameEvent::Lost);
    }
    if check_win_condition(game) {
        return RevealOutcome::Finished(GameEvent::Won {
            first_completion: game.first_completion,
        });
    }
    if tally.mines > 0 {
        RevealOutcome::MineHit {
            errors: game.error_count,
        }
    } else if tally.opened > 0 {
        RevealOutcome::Opened {
            cells: tally.opened,
        }
    } else {
        RevealOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minesweeper::types::GameParams;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// 5x5 with mines at (0,0) and (4,4).
    fn two_mine_game(max_errors: u32) -> MinesweeperGame {
        MinesweeperGame::from_layout(5, &[(0, 0), (4, 4)], max_errors, 2).unwrap()
    }

    #[test]
    fn test_first_reveal_places_mines_safely() {
        let params = GameParams {
            grid_size: 10,
            mine_target: 8,
            max_errors: 3,
            hint_allowance: 0,
        };
        let mut game = MinesweeperGame::new(params, true).unwrap();

        let outcome = reveal(&mut game, 5, 5, &mut rng()).unwrap();

        assert!(matches!(
            outcome,
            RevealOutcome::Opened { .. } | RevealOutcome::Finished(GameEvent::Won { .. })
        ));
        assert!(game.board().mines_placed());
        assert_ne!(game.status(), GameStatus::Lost);
        let cell = game.cell(5, 5).unwrap();
        assert!(cell.is_revealed());
        assert!(!cell.is_mine());
        assert_eq!(cell.adjacent_mines(), 0);
        assert_eq!(game.errors_made(), 0);
    }

    #[test]
    fn test_short_placed_board_wins_on_actual_mines() {
        // A centre click on 4x4 leaves 7 legal cells for a 12-mine target
        let params = GameParams {
            grid_size: 4,
            mine_target: 12,
            max_errors: 3,
            hint_allowance: 0,
        };
        let mut game = MinesweeperGame::new(params, true).unwrap();
        let mut rng = rng();
        reveal(&mut game, 1, 1, &mut rng).unwrap();

        assert!(game.board().mine_actual() < game.board().mine_target());

        let safe: Vec<(usize, usize)> = game
            .board()
            .cells()
            .filter(|c| !c.is_mine())
            .map(|c| (c.row(), c.col()))
            .collect();
        for (row, col) in safe {
            reveal(&mut game, row, col, &mut rng).unwrap();
        }

        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.errors_made(), 0);
        assert_eq!(game.safe_cells_remaining(), 0);
        assert_eq!(game.mines_remaining(), 0);
    }

    #[test]
    fn test_flood_fill_stops_at_numbers() {
        let mut game = two_mine_game(3);

        reveal(&mut game, 2, 2, &mut rng()).unwrap();

        // Everything but the two mines opens: no zero region is walled off
        assert_eq!(game.revealed_count(), 23);
        assert_eq!(game.revealed_mine_count(), 0);
        assert!(game.is_won());
    }

    #[test]
    fn test_flood_fill_skips_flags() {
        let mut game = MinesweeperGame::from_layout(5, &[(0, 0)], 3, 0).unwrap();
        assert!(toggle_flag(&mut game, 4, 4).unwrap());

        reveal(&mut game, 2, 2, &mut rng()).unwrap();

        assert!(!game.cell(4, 4).unwrap().is_revealed());
        assert!(game.cell(4, 4).unwrap().is_flagged());
        // The flagged safe cell blocks the win
        assert!(!game.is_over());
        assert_eq!(game.safe_cells_remaining(), 1);
    }

    #[test]
    fn test_numbered_cell_opens_alone() {
        let mut game = two_mine_game(3);
        let outcome = reveal(&mut game, 0, 1, &mut rng()).unwrap();
        assert_eq!(outcome, RevealOutcome::Opened { cells: 1 });
        assert_eq!(game.revealed_count(), 1);
    }

    #[test]
    fn test_cannot_reveal_flagged() {
        let mut game = two_mine_game(3);
        toggle_flag(&mut game, 3, 3).unwrap();

        let outcome = reveal(&mut game, 3, 3, &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::Ignored);
        assert!(!game.cell(3, 3).unwrap().is_revealed());
    }

    #[test]
    fn test_mine_hit_below_tolerance_continues() {
        let mut game = two_mine_game(2);

        let outcome = reveal(&mut game, 0, 0, &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::MineHit { errors: 1 });
        assert_eq!(game.revealed_mine_count(), 1);
        assert_eq!(game.revealed_count(), 1);
        assert!(!game.is_over());
    }

    #[test]
    fn test_loss_at_tolerance() {
        let mut game = two_mine_game(2);
        reveal(&mut game, 0, 0, &mut rng()).unwrap();

        let outcome = reveal(&mut game, 4, 4, &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::Finished(GameEvent::Lost));
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.errors_made(), 2);
    }

    #[test]
    fn test_win_after_mine_hit() {
        let mut game = two_mine_game(2);
        reveal(&mut game, 0, 0, &mut rng()).unwrap();

        let outcome = reveal(&mut game, 2, 2, &mut rng()).unwrap();

        assert_eq!(
            outcome,
            RevealOutcome::Finished(GameEvent::Won {
                first_completion: true
            })
        );
        assert!(game.is_won());
    }

    #[test]
    fn test_commands_after_game_over_are_ignored() {
        let mut game = two_mine_game(1);
        reveal(&mut game, 0, 0, &mut rng()).unwrap();
        assert!(game.is_over());

        assert_eq!(
            reveal(&mut game, 2, 2, &mut rng()).unwrap(),
            RevealOutcome::Ignored
        );
        // Even out-of-range targets are silent once the game is over
        assert_eq!(
            reveal(&mut game, 99, 99, &mut rng()).unwrap(),
            RevealOutcome::Ignored
        );
        assert!(!toggle_flag(&mut game, 2, 2).unwrap());
        assert_eq!(use_hint(&mut game), HintOutcome::Unavailable);
    }

    #[test]
    fn test_out_of_bounds_reveal_errors() {
        let mut game = two_mine_game(3);
        assert!(reveal(&mut game, 5, 0, &mut rng()).is_err());
        assert!(toggle_flag(&mut game, 0, 5).is_err());
    }

    #[test]
    fn test_flag_requires_first_reveal() {
        let params = GameParams {
            grid_size: 6,
            mine_target: 4,
            max_errors: 1,
            hint_allowance: 0,
        };
        let mut game = MinesweeperGame::new(params, true).unwrap();
        assert!(!toggle_flag(&mut game, 0, 0).unwrap());
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn test_cannot_flag_revealed_cell() {
        let mut game = two_mine_game(3);
        reveal(&mut game, 0, 1, &mut rng()).unwrap();

        assert!(!toggle_flag(&mut game, 0, 1).unwrap());
        assert!(!game.cell(0, 1).unwrap().is_flagged());
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn test_chord_reveals_neighbors_when_satisfied() {
        // Mine at (0,0); (1,1) shows 1
        let mut game = MinesweeperGame::from_layout(5, &[(0, 0), (4, 4)], 3, 0).unwrap();
        reveal(&mut game, 1, 1, &mut rng()).unwrap();
        toggle_flag(&mut game, 0, 0).unwrap();

        let outcome = reveal(&mut game, 1, 1, &mut rng()).unwrap();

        // (2,2) is a zero cell, so the chord cascades across the whole board
        assert_eq!(
            outcome,
            RevealOutcome::Finished(GameEvent::Won {
                first_completion: true
            })
        );
        assert!(game.cell(0, 1).unwrap().is_revealed());
        assert!(game.cell(1, 0).unwrap().is_revealed());
        assert!(game.cell(3, 2).unwrap().is_revealed());
        assert_eq!(game.errors_made(), 0);
    }

    #[test]
    fn test_chord_counts_exploded_mines() {
        let mut game = MinesweeperGame::from_layout(5, &[(0, 0), (4, 4)], 3, 0).unwrap();
        reveal(&mut game, 0, 0, &mut rng()).unwrap();
        reveal(&mut game, 1, 1, &mut rng()).unwrap();

        let outcome = reveal(&mut game, 1, 1, &mut rng()).unwrap();

        assert!(matches!(outcome, RevealOutcome::Finished(GameEvent::Won { .. })));
        assert!(game.cell(0, 1).unwrap().is_revealed());
        assert_eq!(game.errors_made(), 1);
    }

    #[test]
    fn test_chord_mismatch_is_noop() {
        let mut game = MinesweeperGame::from_layout(5, &[(0, 0), (4, 4)], 3, 0).unwrap();
        reveal(&mut game, 1, 1, &mut rng()).unwrap();
        let before = game.revealed_count();

        let outcome = reveal(&mut game, 1, 1, &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::Ignored);
        assert_eq!(game.revealed_count(), before);
    }

    #[test]
    fn test_chord_with_wrong_flag_hits_mine() {
        // (1,1) shows 1 from the mine at (0,0); flag the wrong neighbor
        let mut game = MinesweeperGame::from_layout(5, &[(0, 0), (4, 4)], 3, 0).unwrap();
        reveal(&mut game, 1, 1, &mut rng()).unwrap();
        toggle_flag(&mut game, 0, 1).unwrap();

        let outcome = reveal(&mut game, 1, 1, &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::MineHit { errors: 1 });
        assert!(game.cell(0, 0).unwrap().is_revealed());
    }

    #[test]
    fn test_hint_flags_mine() {
        let mut game = two_mine_game(3);
        reveal(&mut game, 0, 1, &mut rng()).unwrap();

        assert_eq!(use_hint(&mut game), HintOutcome::Armed { remaining: 1 });
        let outcome = reveal(&mut game, 0, 0, &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::HintFlagged);
        let cell = game.cell(0, 0).unwrap();
        assert!(cell.is_flagged());
        assert!(!cell.is_revealed());
        assert_eq!(game.errors_made(), 0);
        assert_eq!(game.flagged_count(), 1);
        assert!(!game.hint_armed());
    }

    #[test]
    fn test_hint_reveals_safe_cell_with_cascade() {
        let mut game = two_mine_game(3);
        use_hint(&mut game);

        let outcome = reveal(&mut game, 2, 2, &mut rng()).unwrap();

        assert!(matches!(outcome, RevealOutcome::Finished(GameEvent::Won { .. })));
        assert!(!game.hint_armed());
    }

    #[test]
    fn test_hint_rejected_on_resolved_cell_stays_armed() {
        let mut game = two_mine_game(3);
        reveal(&mut game, 0, 1, &mut rng()).unwrap();
        use_hint(&mut game);

        let outcome = reveal(&mut game, 0, 1, &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::HintRejected);
        assert!(game.hint_armed());
        assert_eq!(game.hints_remaining(), 1);

        // The redirect still applies to the next reveal
        assert_eq!(
            reveal(&mut game, 4, 4, &mut rng()).unwrap(),
            RevealOutcome::HintFlagged
        );
    }

    #[test]
    fn test_hint_exhaustion() {
        let mut game = two_mine_game(3);
        reveal(&mut game, 0, 1, &mut rng()).unwrap();

        use_hint(&mut game);
        assert_eq!(use_hint(&mut game), HintOutcome::AlreadyArmed);
        reveal(&mut game, 0, 0, &mut rng()).unwrap();
        assert_eq!(use_hint(&mut game), HintOutcome::Armed { remaining: 0 });
        reveal(&mut game, 4, 4, &mut rng()).unwrap();

        assert_eq!(use_hint(&mut game), HintOutcome::Exhausted);
        assert_eq!(game.hints_used(), 2);
    }

    #[test]
    fn test_reveal_all_on_loss_marks_wrong_flags() {
        let mut game = two_mine_game(1);
        reveal(&mut game, 0, 1, &mut rng()).unwrap();
        toggle_flag(&mut game, 2, 2).unwrap();
        toggle_flag(&mut game, 4, 4).unwrap();

        reveal(&mut game, 0, 0, &mut rng()).unwrap();

        assert_eq!(game.status(), GameStatus::Lost);
        let wrong = game.cell(2, 2).unwrap();
        assert!(wrong.is_wrong_flag());
        assert!(wrong.is_revealed());
        // Correctly flagged mine is still revealed
        let flagged_mine = game.cell(4, 4).unwrap();
        assert!(flagged_mine.is_revealed());
        assert!(!flagged_mine.is_wrong_flag());
        // Untouched safe cells stay covered
        assert!(!game.cell(3, 3).unwrap().is_revealed());
    }

    #[test]
    fn test_reveal_all_on_win_flags_every_mine() {
        let mut game = two_mine_game(2);
        reveal(&mut game, 0, 0, &mut rng()).unwrap();
        reveal(&mut game, 2, 2, &mut rng()).unwrap();

        assert!(game.is_won());
        for (row, col) in [(0, 0), (4, 4)] {
            let cell = game.cell(row, col).unwrap();
            assert!(cell.is_flagged());
            assert!(cell.is_revealed());
            assert!(!cell.is_wrong_flag());
        }
        assert_eq!(game.mines_remaining(), 0);
    }
}
