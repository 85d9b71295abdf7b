//! Constants for board dimensions, pawn movement, and search parameters.
//!
//! This module contains all the configuration constants for the Quoridor
//! engine: the board geometry, the displacement vectors a pawn can attempt,
//! the MCTS parameters, and the time-budget schedule used by the agent.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Quoridor is played on a fixed 9x9 grid.
pub const SIZE: i8 = 9;

/// Number of walls each player holds at the start of a game.
pub const STARTING_WALLS: i32 = 10;

/// Sentinel position meaning "no opponent on the board".
///
/// Passed as the opponent argument when a legality check must ignore
/// occupancy. Far enough off-board that the Manhattan-distance jump test
/// can never trigger.
pub const NO_OPPONENT: (i8, i8) = (-10, -10);

/// Displacement vectors a pawn may attempt from its current cell:
/// 4 orthogonal steps, 4 diagonal jumps, 4 straight jumps.
///
/// The order matters: it fixes the order in which the A* search pushes
/// successors, which in turn fixes which of several equally short paths is
/// returned.
pub const PAWN_OFFSETS: [(i8, i8); 12] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (2, 0),
    (-2, 0),
    (0, 2),
    (0, -2),
];

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Exploration constant in the UCT formula (`sqrt(2)`).
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Maximum number of MCTS iterations per decision.
pub const MAX_ITERATIONS: usize = 550;

// =============================================================================
// Time Budget Schedule
// =============================================================================

/// Per-player move number below which the budget is front-loaded small
/// (`move_no` seconds per move).
pub const OPENING_MOVES: usize = 6;

/// Per-player move number up to which the mid-game schedule applies.
pub const MIDGAME_MOVES: usize = 27;

/// Per-player move number past which no search is run at all; the agent
/// falls back to following its shortest path.
pub const MAX_GAME_MOVES: usize = 40;

/// Seconds of time credit kept in reserve during the mid-game.
pub const MIDGAME_RESERVE: f64 = 60.0;

/// Seconds of time credit kept in reserve toward the endgame.
pub const ENDGAME_RESERVE: f64 = 2.0;
