//! The playing agent: time budgets, the search loop, and fallbacks.
//!
//! `Agent::decide` is the single entry point a game harness calls each
//! turn. It converts the percept into a board, budgets wall-clock time for
//! the decision from the game-stage schedule, runs the MCTS loop, and
//! returns the chosen action. Any failure inside the search degrades to a
//! uniformly random legal action so the agent never forfeits on an error.

use std::time::Instant;

use anyhow::{Context, Result};

use crate::board::{Action, Board, Percept};
use crate::constants::{
    ENDGAME_RESERVE, MAX_GAME_MOVES, MAX_ITERATIONS, MIDGAME_MOVES, MIDGAME_RESERVE, OPENING_MOVES,
};
use crate::mcts::Tree;

/// A Quoridor player backed by Monte Carlo tree search.
pub struct Agent {
    rng: fastrand::Rng,
    iteration_limit: usize,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
            iteration_limit: MAX_ITERATIONS,
        }
    }

    /// Seeded agent; two agents built from the same seed make identical
    /// decisions given identical inputs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            iteration_limit: MAX_ITERATIONS,
        }
    }

    /// Seeded agent with a custom iteration cap, for fast bounded runs.
    pub fn with_limits(seed: u64, iteration_limit: usize) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            iteration_limit,
        }
    }

    /// Decide one action for `player`.
    ///
    /// `step` is the global ply counter starting at 1; `time_left` is the
    /// player's remaining time credit in seconds, or `None` for untimed
    /// play. Never fails: if the search errors out the agent plays a
    /// uniformly random legal action instead.
    pub fn decide(
        &mut self,
        percept: &Percept,
        player: usize,
        step: usize,
        time_left: Option<f64>,
    ) -> Action {
        let board = Board::from_percept(percept);
        match self.search(&board, player, step, time_left) {
            Ok(action) => action,
            Err(err) => {
                eprintln!("search failed ({err:#}); playing a random legal action");
                self.random_action(&board, player)
            }
        }
    }

    fn search(
        &mut self,
        board: &Board,
        player: usize,
        step: usize,
        time_left: Option<f64>,
    ) -> Result<Action> {
        let time_left = time_left.unwrap_or(f64::INFINITY);
        let budget = time_budget(step, time_left);

        // Past the scheduled game length there is no time to search at
        // all; walk the shortest path directly.
        if budget == 0.0 {
            let path = board.shortest_path(player)?;
            let first = path
                .first()
                .context("already standing on the goal row")?;
            return Ok(Action::Pawn(*first));
        }

        // With no walls left every expansion is a single forced child, so
        // one iteration already determines the move. At least one
        // iteration always runs.
        let mut iterations_left = if board.nb_walls[player] == 0 {
            1
        } else {
            self.iteration_limit.max(1)
        };

        let mut tree = Tree::new(player, board.clone());
        let start = Instant::now();
        loop {
            let leaf = tree.select(&mut self.rng);
            let expanded = tree
                .expand(leaf, &mut self.rng)
                .context("expansion produced no children")?;
            let result = tree.evaluate(expanded)?;
            tree.backpropagate(expanded, result);

            // The budget is only checked between complete iterations; an
            // iteration in flight always finishes.
            iterations_left -= 1;
            if iterations_left == 0 || start.elapsed().as_secs_f64() >= budget {
                break;
            }
        }

        tree.best_action(&mut self.rng)?
            .context("no candidate action at the root")
    }

    /// Uniformly random action over the exhaustive legal-action list.
    fn random_action(&mut self, board: &Board, player: usize) -> Action {
        let actions = board.legal_actions(player);
        actions[self.rng.usize(..actions.len())]
    }
}

/// Wall-clock budget in seconds for the decision at global ply `step`.
///
/// The schedule is keyed on the per-player move number `(step + 1) / 2`:
/// the first few moves get `move_no` seconds each, the mid-game spreads the
/// remaining credit (minus a reserve) evenly over the moves up to 27, the
/// late game does the same up to move 40 with a thinner reserve, and past
/// move 40 the budget is zero.
pub fn time_budget(step: usize, time_left: f64) -> f64 {
    let move_no = (step + 1) / 2;
    if move_no < OPENING_MOVES {
        move_no as f64
    } else if move_no < MIDGAME_MOVES {
        (time_left - MIDGAME_RESERVE) / (MIDGAME_MOVES - move_no) as f64
    } else if move_no < MAX_GAME_MOVES {
        (time_left - ENDGAME_RESERVE) / (MAX_GAME_MOVES - move_no) as f64
    } else {
        0.0
    }
}
