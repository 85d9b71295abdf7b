//! Heuristic wall-candidate generation for tree expansion.
//!
//! Exhaustive wall enumeration is quadratic in the board size and blows up
//! the branching factor, so expansion only considers "interesting" anchors:
//! extensions and crossings of walls already on the board, plus a small
//! fixed neighborhood around the opponent's pawn (where a wall can cut the
//! opponent's direct path).
//!
//! Candidates are returned as `(horizontal, row, col)` triples. They are not
//! legality-checked here; each one still goes through
//! [`Board::wall_placement_legal`](crate::board::Board::wall_placement_legal)
//! before being materialized as an action.

use std::collections::BTreeSet;

use crate::board::{Board, Cell};

/// A wall candidate: orientation flag plus anchor.
pub type WallCandidate = (bool, i8, i8);

/// Collect the heuristically interesting wall anchors for the given board
/// and opponent position.
///
/// For every existing wall: the two anchors extending its run by two cells,
/// and the full 3x3 anchor neighborhood in the opposite orientation. Around
/// the opponent pawn: the four horizontal and four vertical anchors whose
/// wall would touch its cell. Duplicates collapse into the set; a `BTreeSet`
/// keeps the iteration order deterministic so seeded searches reproduce.
pub fn interesting_walls(board: &Board, opponent: Cell) -> BTreeSet<WallCandidate> {
    let mut walls = BTreeSet::new();

    for &(row, col) in &board.horiz_walls {
        walls.insert((true, row, col - 2));
        walls.insert((true, row, col + 2));
        for dr in -1i8..=1 {
            for dc in -1i8..=1 {
                walls.insert((false, row - dr, col - dc));
            }
        }
    }

    for &(row, col) in &board.verti_walls {
        walls.insert((false, row + 2, col));
        walls.insert((false, row - 2, col));
        for dr in -1i8..=1 {
            for dc in -1i8..=1 {
                walls.insert((true, row - dr, col - dc));
            }
        }
    }

    let (opp_row, opp_col) = opponent;
    walls.insert((true, opp_row - 1, opp_col - 1));
    walls.insert((true, opp_row - 1, opp_col));
    walls.insert((true, opp_row, opp_col - 1));
    walls.insert((true, opp_row, opp_col));
    walls.insert((false, opp_row, opp_col - 1));
    walls.insert((false, opp_row, opp_col));
    walls.insert((false, opp_row - 1, opp_col - 1));
    walls.insert((false, opp_row - 1, opp_col));

    walls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_neighborhood() {
        let board = Board::new();
        let walls = interesting_walls(&board, (4, 4));
        // No walls on the board: exactly the 8 anchors around the opponent.
        assert_eq!(walls.len(), 8);
        for horizontal in [true, false] {
            assert!(walls.contains(&(horizontal, 3, 3)));
            assert!(walls.contains(&(horizontal, 3, 4)));
            assert!(walls.contains(&(horizontal, 4, 3)));
            assert!(walls.contains(&(horizontal, 4, 4)));
        }
    }

    #[test]
    fn test_existing_wall_extensions_and_crossings() {
        let mut board = Board::new();
        board.add_wall_unchecked((4, 4), true, 0);
        let walls = interesting_walls(&board, (8, 4));

        // Run extensions two anchors along the wall.
        assert!(walls.contains(&(true, 4, 2)));
        assert!(walls.contains(&(true, 4, 6)));
        // The 3x3 cross-orientation neighborhood.
        for dr in -1..=1i8 {
            for dc in -1..=1i8 {
                assert!(walls.contains(&(false, 4 + dr, 4 + dc)));
            }
        }
        // Immediate collinear anchors are not proposed as horizontal runs.
        assert!(!walls.contains(&(true, 4, 3)));
        assert!(!walls.contains(&(true, 4, 5)));
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut board = Board::new();
        board.add_wall_unchecked((4, 4), true, 0);
        board.add_wall_unchecked((4, 4), true, 1);
        let once = {
            let mut b = Board::new();
            b.add_wall_unchecked((4, 4), true, 0);
            interesting_walls(&b, (8, 4))
        };
        assert_eq!(interesting_walls(&board, (8, 4)), once);
    }

    #[test]
    fn test_candidates_near_edges_may_be_off_board() {
        // Pruning proposes raw anchors; bounds are the legality check's job.
        let board = Board::new();
        let walls = interesting_walls(&board, (0, 0));
        assert!(walls.contains(&(true, -1, -1)));
        assert!(walls.iter().any(|&(_, r, c)| r >= 0 && c >= 0));
    }
}
