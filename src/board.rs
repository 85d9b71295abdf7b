//! Quoridor board representation, legality model, and pathfinding.
//!
//! This module provides the core game logic for Quoridor, including:
//! - Board state representation (pawns, goal rows, wall sets, wall counts)
//! - Pawn-move legality with the adjacent-pawn jump rule
//! - Wall-placement legality with the no-dead-end invariant
//! - A* shortest-path search to a player's goal row
//! - Exhaustive legal-action enumeration and checked/unchecked mutators
//!
//! The board is value-like: every mutation performed during search operates
//! on a `clone()`, never on a shared instance, so tree nodes never alias
//! board state.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use crate::constants::{NO_OPPONENT, PAWN_OFFSETS, SIZE, STARTING_WALLS};

/// A cell on the board as `(row, col)`.
///
/// Signed, because legality arithmetic produces off-board intermediates and
/// the "no opponent" sentinel lives at `(-10, -10)`.
pub type Cell = (i8, i8);

/// Failure conditions of the game model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No route from a pawn to its goal row under the current walls and
    /// opponent occupancy.
    NoPath,
    /// Illegal or malformed action passed to the checked mutator.
    InvalidAction(usize),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NoPath => write!(f, "no path to the goal row"),
            GameError::InvalidAction(player) => {
                write!(f, "invalid action for player {player}")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// A move in the game: a pawn displacement or a wall placement.
///
/// Walls are anchored at the intersection cell `(row, col)` and occupy the
/// two corridor segments adjacent to that intersection in their
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the pawn to the given cell.
    Pawn(Cell),
    /// Place a horizontal wall anchored at the given cell.
    HorizontalWall(Cell),
    /// Place a vertical wall anchored at the given cell.
    VerticalWall(Cell),
}

impl Action {
    /// Decode the external 3-tuple encoding `(kind, row, col)` where kind
    /// is one of `"P"`, `"WH"`, `"WV"`. Returns `None` for unknown kinds.
    pub fn from_parts(kind: &str, row: i8, col: i8) -> Option<Action> {
        match kind {
            "P" => Some(Action::Pawn((row, col))),
            "WH" => Some(Action::HorizontalWall((row, col))),
            "WV" => Some(Action::VerticalWall((row, col))),
            _ => None,
        }
    }

    /// Encode into the external 3-tuple representation.
    pub fn to_parts(self) -> (&'static str, i8, i8) {
        match self {
            Action::Pawn((row, col)) => ("P", row, col),
            Action::HorizontalWall((row, col)) => ("WH", row, col),
            Action::VerticalWall((row, col)) => ("WV", row, col),
        }
    }

    /// True for pawn moves, false for wall placements.
    pub fn is_pawn_move(self) -> bool {
        matches!(self, Action::Pawn(_))
    }

    /// The destination cell or wall anchor of this action.
    pub fn cell(self) -> Cell {
        match self {
            Action::Pawn(cell) | Action::HorizontalWall(cell) | Action::VerticalWall(cell) => cell,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, row, col) = self.to_parts();
        write!(f, "{kind}({row}, {col})")
    }
}

/// External board snapshot handed to the agent by the match harness.
///
/// Copied verbatim into a [`Board`] with no validation (trusted input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Percept {
    pub pawns: [Cell; 2],
    pub goals: [i8; 2],
    pub horiz_walls: Vec<Cell>,
    pub verti_walls: Vec<Cell>,
    pub nb_walls: [i32; 2],
}

impl From<&Board> for Percept {
    fn from(board: &Board) -> Self {
        Percept {
            pawns: board.pawns,
            goals: board.goals,
            horiz_walls: board.horiz_walls.clone(),
            verti_walls: board.verti_walls.clone(),
            nb_walls: board.nb_walls,
        }
    }
}

/// A Quoridor position.
///
/// Wall anchors are confined to `0 <= row, col < SIZE - 1`, and an anchor
/// hosts at most one wall. The unchecked mutators do not enforce either;
/// the checked ones do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Pawn positions, indexed by player.
    pub pawns: [Cell; 2],
    /// Goal row per player.
    pub goals: [i8; 2],
    /// Remaining walls per player. Signed: the unchecked mutator decrements
    /// without a floor.
    pub nb_walls: [i32; 2],
    /// Anchors of the horizontal walls on the board.
    pub horiz_walls: Vec<Cell>,
    /// Anchors of the vertical walls on the board.
    pub verti_walls: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Manhattan distance between two cells.
#[inline]
fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.0 as i32 - b.0 as i32).abs() + (a.1 as i32 - b.1 as i32).abs()
}

impl Board {
    /// Create the initial position: player 0 at (0,4) aiming for row 8,
    /// player 1 at (8,4) aiming for row 0, ten walls each, no walls placed.
    pub fn new() -> Self {
        Board {
            pawns: [(0, 4), (SIZE - 1, 4)],
            goals: [SIZE - 1, 0],
            nb_walls: [STARTING_WALLS, STARTING_WALLS],
            horiz_walls: Vec::new(),
            verti_walls: Vec::new(),
        }
    }

    /// Build a board from an external percept, copying it verbatim.
    pub fn from_percept(percept: &Percept) -> Self {
        Board {
            pawns: percept.pawns,
            goals: percept.goals,
            nb_walls: percept.nb_walls,
            horiz_walls: percept.horiz_walls.clone(),
            verti_walls: percept.verti_walls.clone(),
        }
    }

    /// Single-step pawn legality, ignoring the opponent.
    ///
    /// For each of the four orthogonal directions, the edge is occluded iff
    /// one of the two wall anchors adjacent to it (in the matching
    /// orientation) is occupied. Zero-length and off-board moves are
    /// rejected; so is anything that is not a single orthogonal step.
    fn single_step_legal(&self, from: Cell, to: Cell) -> bool {
        let (row, col) = from;
        let (to_row, to_col) = to;

        if (row == to_row && col == to_col)
            || to_row >= SIZE
            || to_row < 0
            || to_col >= SIZE
            || to_col < 0
        {
            return false;
        }

        let wall_right = self.verti_walls.contains(&(row, col))
            || self.verti_walls.contains(&(row - 1, col));
        let wall_left = self.verti_walls.contains(&(row - 1, col - 1))
            || self.verti_walls.contains(&(row, col - 1));
        let wall_up = self.horiz_walls.contains(&(row - 1, col - 1))
            || self.horiz_walls.contains(&(row - 1, col));
        let wall_down = self.horiz_walls.contains(&(row, col))
            || self.horiz_walls.contains(&(row, col - 1));

        if to_row == row + 1 && to_col == col {
            return !wall_down;
        }
        if to_row == row - 1 && to_col == col {
            return !wall_up;
        }
        if to_row == row && to_col == col + 1 {
            return !wall_right;
        }
        if to_row == row && to_col == col - 1 {
            return !wall_left;
        }
        false
    }

    /// Full pawn-move legality, including jumps over an adjacent opponent.
    ///
    /// A jump (Manhattan distance `from -> opponent -> to` equal to 2) is
    /// legal when both underlying single steps are legal with no opponent
    /// present, and, if the jump is diagonal, the straight jump over the
    /// opponent is itself blocked by a wall or the board edge.
    pub fn pawn_move_legal(&self, from: Cell, to: Cell, opponent: Cell) -> bool {
        if to == opponent || to == from {
            return false;
        }

        if manhattan(from, opponent) + manhattan(opponent, to) == 2 {
            let ok = self.pawn_move_legal(opponent, to, NO_OPPONENT)
                && self.pawn_move_legal(from, opponent, NO_OPPONENT);
            if !ok {
                return false;
            }
            let dr = (to.0 - from.0) as i32;
            let dc = (to.1 - from.1) as i32;
            if dr * dr + dc * dc == 2 {
                // Diagonal jumps are only legal when continuing straight
                // over the opponent is unavailable.
                let straight = (
                    opponent.0 + (opponent.0 - from.0),
                    opponent.1 + (opponent.1 - from.1),
                );
                return !self.pawn_move_legal(opponent, straight, NO_OPPONENT);
            }
            return true;
        }

        self.single_step_legal(from, to)
    }

    /// True if `player` may move its pawn to `to`.
    pub fn can_move_here(&self, to: Cell, player: usize) -> bool {
        self.pawn_move_legal(self.pawns[player], to, self.pawns[1 - player])
    }

    /// Wall-placement legality at `pos` with the given orientation.
    ///
    /// The anchor must be in bounds and free, the wall must not extend a
    /// collinear run through a neighboring anchor, and placing it must
    /// leave both players a path to their goal rows. The path test places
    /// the wall provisionally on a probe copy of the board.
    ///
    /// The run check only inspects the immediate neighbor anchors, not the
    /// full transitive run.
    pub fn wall_placement_legal(&self, pos: Cell, horizontal: bool) -> bool {
        let (row, col) = pos;
        if row >= SIZE - 1 || row < 0 || col >= SIZE - 1 || col < 0 {
            return false;
        }
        if self.horiz_walls.contains(&pos) || self.verti_walls.contains(&pos) {
            return false;
        }

        if horizontal {
            if self.horiz_walls.contains(&(row, col + 1))
                || self.horiz_walls.contains(&(row, col - 1))
            {
                return false;
            }
        } else if self.verti_walls.contains(&(row - 1, col))
            || self.verti_walls.contains(&(row + 1, col))
        {
            return false;
        }

        let mut probe = self.clone();
        if horizontal {
            probe.horiz_walls.push(pos);
        } else {
            probe.verti_walls.push(pos);
        }
        probe.paths_exist()
    }

    /// True if both players still have a path to their goal rows.
    pub fn paths_exist(&self) -> bool {
        self.min_steps(0).is_ok() && self.min_steps(1).is_ok()
    }

    /// A* search for a shortest pawn-move sequence from `player`'s position
    /// to any cell in its goal row, under the current walls and opponent
    /// position.
    ///
    /// The returned path excludes the start cell and ends on the goal row;
    /// it is empty when the pawn already stands on its goal row. The open
    /// set is keyed by `(estimated_total, path_length, row, col)` so that
    /// ties between equally short paths resolve deterministically; callers
    /// compare the first step of the result, so this ordering is part of
    /// the contract.
    pub fn shortest_path(&self, player: usize) -> Result<Vec<Cell>, GameError> {
        let start = self.pawns[player];
        let goal = self.goals[player];
        let opponent = self.pawns[1 - player];

        if start.0 == goal {
            return Ok(Vec::new());
        }

        let heuristic = |cell: Cell| (cell.0 as i32 - goal as i32).abs();

        const S: usize = SIZE as usize;
        let mut visited = [[false; S]; S];
        let mut prede: [[Option<Cell>; S]; S] = [[None; S]; S];

        let mut open: BinaryHeap<Reverse<(i32, i32, Cell)>> = BinaryHeap::new();
        open.push(Reverse((heuristic(start), 0, start)));

        while let Some(Reverse((_, dist, cell))) = open.pop() {
            let (row, col) = cell;
            visited[row as usize][col as usize] = true;

            if row == goal {
                // Walk the predecessor links back to the start.
                let mut path = vec![cell];
                let mut curr = prede[row as usize][col as usize];
                while let Some(c) = curr {
                    if c == start {
                        break;
                    }
                    path.push(c);
                    curr = prede[c.0 as usize][c.1 as usize];
                }
                path.reverse();
                return Ok(path);
            }

            for (dr, dc) in PAWN_OFFSETS {
                let next = (row + dr, col + dc);
                if !self.pawn_move_legal(cell, next, opponent) {
                    continue;
                }
                if visited[next.0 as usize][next.1 as usize] {
                    continue;
                }
                let next_dist = dist + 1;
                open.push(Reverse((next_dist + heuristic(next), next_dist, next)));
                prede[next.0 as usize][next.1 as usize] = Some(cell);
            }
        }

        Err(GameError::NoPath)
    }

    /// Minimum number of pawn moves before `player` reaches its goal row.
    pub fn min_steps(&self, player: usize) -> Result<usize, GameError> {
        Ok(self.shortest_path(player)?.len())
    }

    /// Like [`Board::min_steps`], but recovers from a transient `NoPath`
    /// caused by opponent occupancy: the opponent is substituted onto the
    /// querying player's own cell, so the blocking square counts as
    /// unoccupied for the purpose of measuring the best-case distance.
    pub fn min_steps_safe(&self, player: usize) -> Result<usize, GameError> {
        match self.shortest_path(player) {
            Ok(path) => Ok(path.len()),
            Err(GameError::NoPath) => {
                let mut probe = self.clone();
                probe.pawns[1 - player] = probe.pawns[player];
                Ok(probe.shortest_path(player)?.len())
            }
            Err(err) => Err(err),
        }
    }

    /// Enumerate the legal pawn moves of `player` over the 12 displacement
    /// vectors.
    pub fn legal_pawn_moves(&self, player: usize) -> Vec<Action> {
        let (row, col) = self.pawns[player];
        let mut moves = Vec::new();
        for (dr, dc) in PAWN_OFFSETS {
            let to = (row + dr, col + dc);
            if self.pawn_move_legal(self.pawns[player], to, self.pawns[1 - player]) {
                moves.push(Action::Pawn(to));
            }
        }
        moves
    }

    /// Enumerate every legal wall placement of `player`, exhaustively over
    /// all anchors and both orientations. Empty when the player has no
    /// walls left.
    pub fn legal_wall_moves(&self, player: usize) -> Vec<Action> {
        let mut moves = Vec::new();
        if self.nb_walls[player] <= 0 {
            return moves;
        }
        for row in 0..SIZE - 1 {
            for col in 0..SIZE - 1 {
                if self.wall_placement_legal((row, col), true) {
                    moves.push(Action::HorizontalWall((row, col)));
                }
                if self.wall_placement_legal((row, col), false) {
                    moves.push(Action::VerticalWall((row, col)));
                }
            }
        }
        moves
    }

    /// All legal actions of `player`: pawn moves followed by wall
    /// placements.
    pub fn legal_actions(&self, player: usize) -> Vec<Action> {
        let mut actions = self.legal_pawn_moves(player);
        actions.extend(self.legal_wall_moves(player));
        actions
    }

    /// True if the action would be accepted by the checked mutator.
    ///
    /// Wall validity does not include the wall-count check; [`Board::add_wall`]
    /// performs that and silently refuses when the count is exhausted.
    pub fn is_action_valid(&self, action: Action, player: usize) -> bool {
        match action {
            Action::Pawn(to) => {
                self.pawn_move_legal(self.pawns[player], to, self.pawns[1 - player])
            }
            Action::HorizontalWall(pos) => self.wall_placement_legal(pos, true),
            Action::VerticalWall(pos) => self.wall_placement_legal(pos, false),
        }
    }

    /// Place a wall for `player` if the placement is legal and the player
    /// still has walls; otherwise do nothing.
    pub fn add_wall(&mut self, pos: Cell, horizontal: bool, player: usize) {
        if self.nb_walls[player] <= 0 || !self.wall_placement_legal(pos, horizontal) {
            return;
        }
        if horizontal {
            self.horiz_walls.push(pos);
        } else {
            self.verti_walls.push(pos);
        }
        self.nb_walls[player] -= 1;
    }

    /// Place a wall without any legality check, decrementing the player's
    /// wall count.
    pub fn add_wall_unchecked(&mut self, pos: Cell, horizontal: bool, player: usize) {
        if horizontal {
            self.horiz_walls.push(pos);
        } else {
            self.verti_walls.push(pos);
        }
        self.nb_walls[player] -= 1;
    }

    /// Move `player`'s pawn to `pos`.
    pub fn move_pawn(&mut self, pos: Cell, player: usize) {
        self.pawns[player] = pos;
    }

    /// Checked mutator: re-validate and apply the action.
    ///
    /// # Errors
    /// [`GameError::InvalidAction`] if the action is illegal for `player`.
    pub fn play_action(&mut self, action: Action, player: usize) -> Result<(), GameError> {
        if !self.is_action_valid(action, player) {
            return Err(GameError::InvalidAction(player));
        }
        match action {
            Action::Pawn(to) => self.move_pawn(to, player),
            Action::HorizontalWall(pos) => self.add_wall(pos, true, player),
            Action::VerticalWall(pos) => self.add_wall(pos, false, player),
        }
        Ok(())
    }

    /// Unchecked mutator, used inside the search where legality was already
    /// established by the generator. Applies the same state changes as the
    /// checked path.
    pub fn play_action_unchecked(&mut self, action: Action, player: usize) {
        match action {
            Action::Pawn(to) => self.move_pawn(to, player),
            Action::HorizontalWall(pos) => self.add_wall_unchecked(pos, true, player),
            Action::VerticalWall(pos) => self.add_wall_unchecked(pos, false, player),
        }
    }

    /// True iff either pawn stands on its goal row.
    pub fn is_finished(&self) -> bool {
        self.pawns[0].0 == self.goals[0] || self.pawns[1].0 == self.goals[1]
    }
}

impl fmt::Display for Board {
    /// Render the grid with pawns (`P1`, `P2`), empty cells (`OO`), and
    /// wall segments.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..SIZE {
            for j in 0..SIZE {
                if self.pawns[0] == (i, j) {
                    write!(f, "P1")?;
                } else if self.pawns[1] == (i, j) {
                    write!(f, "P2")?;
                } else {
                    write!(f, "OO")?;
                }
                if self.verti_walls.contains(&(i, j)) || self.verti_walls.contains(&(i - 1, j)) {
                    write!(f, "|")?;
                } else {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
            for j in 0..SIZE {
                if self.horiz_walls.contains(&(i, j)) {
                    write!(f, "---")?;
                } else if self.horiz_walls.contains(&(i, j - 1)) {
                    write!(f, "-- ")?;
                } else if self.verti_walls.contains(&(i, j)) {
                    write!(f, "  |")?;
                } else {
                    write!(f, "   ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
