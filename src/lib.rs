//! Quoridor-Rust: a Monte Carlo tree search Quoridor agent.
//!
//! This crate provides a decision engine for 9x9 Quoridor: full rules
//! enforcement (pawn jumps, wall placement, the no-dead-end rule), A*
//! shortest paths, and an MCTS player whose rollouts are replaced by a
//! shortest-path-race evaluation.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, pawn offsets, and search parameters
//! - [`board`] - Board state, move legality, A* pathfinding
//! - [`walls`] - Heuristic wall-candidate pruning for tree expansion
//! - [`mcts`] - The search tree: selection, expansion, evaluation, backprop
//! - [`agent`] - Time budgeting, the search loop, and fallbacks
//!
//! ## Example
//!
//! ```
//! use quoridor_rust::agent::Agent;
//! use quoridor_rust::board::{Board, Percept};
//!
//! // Snapshot of the initial position, as a harness would send it.
//! let board = Board::new();
//! let percept = Percept::from(&board);
//!
//! // Decide player 0's first move with a small, reproducible search.
//! let mut agent = Agent::with_limits(42, 50);
//! let action = agent.decide(&percept, 0, 1, Some(120.0));
//! assert!(board.is_action_valid(action, 0));
//! ```

pub mod agent;
pub mod board;
pub mod constants;
pub mod mcts;
pub mod walls;
