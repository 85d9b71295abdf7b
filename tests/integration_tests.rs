//! Integration tests for quoridor-rust
//!
//! These exercise the agent end to end the way a match harness would:
//! percepts in, actions out, every action replayed through the checked
//! rules layer. Searches are seeded and iteration-capped so runs stay fast
//! and reproducible.

use quoridor_rust::agent::Agent;
use quoridor_rust::board::{Action, Board, Percept};

// =============================================================================
// Helper functions for driving games
// =============================================================================

/// Play up to `max_plies` plies between two seeded agents, validating every
/// action through the checked rules layer. Returns the final board and the
/// number of plies actually played.
fn drive_game(seeds: [u64; 2], iterations: usize, max_plies: usize) -> (Board, usize) {
    let mut agents = [
        Agent::with_limits(seeds[0], iterations),
        Agent::with_limits(seeds[1], iterations),
    ];
    let mut board = Board::new();

    for step in 1..=max_plies {
        let player = (step - 1) % 2;
        let percept = Percept::from(&board);
        let action = agents[player].decide(&percept, player, step, Some(300.0));

        assert!(
            board.is_action_valid(action, player),
            "step {step}: player {player} proposed illegal {action}"
        );
        board
            .play_action(action, player)
            .unwrap_or_else(|e| panic!("step {step}: {e}"));

        if board.is_finished() {
            return (board, step);
        }
    }
    (board, max_plies)
}

// =============================================================================
// Full-game behavior
// =============================================================================

#[test]
fn test_agents_play_only_legal_moves() {
    // Legality is asserted inside drive_game on every ply.
    let (board, plies) = drive_game([1, 2], 20, 60);
    assert!(plies >= 8, "game ended implausibly early");
    assert_ne!(board, Board::new());
}

#[test]
fn test_wall_count_bookkeeping() {
    let (board, _) = drive_game([3, 4], 20, 60);
    let placed = board.horiz_walls.len() + board.verti_walls.len();
    let spent = (10 - board.nb_walls[0]) + (10 - board.nb_walls[1]);
    assert_eq!(placed as i32, spent);
    assert!(board.nb_walls[0] >= 0 && board.nb_walls[1] >= 0);
}

#[test]
fn test_walls_exhausted_endgame_finishes() {
    // With no walls on either side the game is a pure race; both agents
    // collapse to their shortest paths and someone reaches the goal.
    let mut agents = [Agent::with_seed(5), Agent::with_seed(6)];
    let mut board = Board::new();
    board.nb_walls = [0, 0];
    board.pawns = [(4, 2), (5, 6)];

    let mut finished = false;
    for step in 1..=20 {
        let player = (step - 1) % 2;
        let action = agents[player].decide(&Percept::from(&board), player, step, Some(300.0));
        assert!(matches!(action, Action::Pawn(_)));
        board.play_action(action, player).unwrap();
        if board.is_finished() {
            finished = true;
            break;
        }
    }
    assert!(finished, "pure race did not reach a goal in 20 plies");
}

#[test]
fn test_seeded_games_reproduce() {
    let (a, plies_a) = drive_game([7, 8], 15, 40);
    let (b, plies_b) = drive_game([7, 8], 15, 40);
    assert_eq!(plies_a, plies_b);
    assert_eq!(a, b);
}

// =============================================================================
// Budget schedule at the harness boundary
// =============================================================================

#[test]
fn test_past_schedule_both_players_walk_their_paths() {
    let board = Board::new();
    let mut a0 = Agent::with_seed(11);
    let mut a1 = Agent::with_seed(12);

    // Move number 40 and beyond: zero budget, straight to the path step.
    let action0 = a0.decide(&Percept::from(&board), 0, 79, Some(50.0));
    let action1 = a1.decide(&Percept::from(&board), 1, 80, Some(50.0));
    assert_eq!(action0, Action::Pawn((1, 4)));
    assert_eq!(action1, Action::Pawn((7, 4)));
}

// =============================================================================
// Action wire format
// =============================================================================

#[test]
fn test_actions_round_trip_through_their_wire_parts() {
    let mut agent = Agent::with_limits(13, 20);
    let board = Board::new();
    let action = agent.decide(&Percept::from(&board), 0, 1, Some(300.0));

    let (kind, row, col) = action.to_parts();
    assert_eq!(Action::from_parts(kind, row, col), Some(action));
}
