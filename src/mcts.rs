//! Monte Carlo Tree Search over Quoridor positions.
//!
//! One decision runs Selection -> Expansion -> Evaluation ->
//! Backpropagation in a loop until the caller's budget is exhausted, then
//! picks the best root action. Instead of random rollouts, evaluation is a
//! static comparison of both players' safe shortest-path lengths; the
//! action-selection heuristics depend on exactly this evaluation semantics.
//!
//! The tree is an arena: nodes live in a `Vec`, children are id lists owned
//! by the arena, and the parent link is a plain non-owning id. Every node
//! owns its board exclusively (boards are cloned on expansion), so no
//! iteration ever observes another iteration's in-progress state.

use fastrand::Rng;

use crate::board::{Action, Board, GameError};
use crate::constants::EXPLORATION;
use crate::walls::interesting_walls;

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// The root is always the first node in the arena.
pub const ROOT: NodeId = 0;

/// A node in the search tree.
pub struct Node {
    /// The player who produced this node's action, i.e. the opponent of
    /// the player to move from this node. For the root this is the
    /// opponent of the deciding player, so the root's children are the
    /// deciding player's candidate actions.
    pub player: usize,
    /// The action that led here; `None` for the root.
    pub action: Option<Action>,
    /// True if the action matches the first step of the mover's shortest
    /// path at expansion time.
    pub follows_shortest_path: bool,
    /// Board after the action, owned exclusively by this node.
    pub board: Board,
    /// Number of wins backpropagated through this node.
    pub wins: u32,
    /// Number of completed iterations involving this node.
    pub visits: u32,
    /// Non-owning back-reference to the parent.
    pub parent: Option<NodeId>,
    /// Children, created once when this node is expanded.
    pub children: Vec<NodeId>,
}

/// An MCTS tree for one decision. Discarded wholesale after the move is
/// chosen.
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree whose root represents the position `player` must move
    /// from.
    pub fn new(player: usize, board: Board) -> Self {
        Tree {
            nodes: vec![Node {
                player: 1 - player,
                action: None,
                follows_shortest_path: false,
                board,
                wins: 0,
                visits: 0,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn add_child(
        &mut self,
        parent: NodeId,
        player: usize,
        action: Action,
        follows_shortest_path: bool,
        board: Board,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            player,
            action: Some(action),
            follows_shortest_path,
            board,
            wins: 0,
            visits: 0,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// UCT score of a node: `wins/visits + sqrt(2) * sqrt(ln(parent
    /// visits) / visits)`. Never-visited nodes score infinity and are
    /// always preferred.
    pub fn uct_value(&self, id: NodeId) -> f64 {
        let node = &self.nodes[id];
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = node.parent.map_or(0, |p| self.nodes[p].visits);
        node.wins as f64 / node.visits as f64
            + EXPLORATION * ((parent_visits as f64).ln() / node.visits as f64).sqrt()
    }

    /// Descend from the root to the node to expand this iteration.
    ///
    /// At each level the children tied at the maximum UCT are narrowed
    /// down: a pawn move along the shortest path beats any pawn move,
    /// which beats any wall move; remaining ties break uniformly at
    /// random. Descent stops at a node with no children or no visits.
    pub fn select(&self, rng: &mut Rng) -> NodeId {
        let mut id = ROOT;
        loop {
            let node = &self.nodes[id];
            if node.children.is_empty() || node.visits == 0 {
                return id;
            }

            let max_uct = node
                .children
                .iter()
                .map(|&child| self.uct_value(child))
                .fold(f64::NEG_INFINITY, f64::max);
            let tied: Vec<NodeId> = node
                .children
                .iter()
                .copied()
                .filter(|&child| self.uct_value(child) == max_uct)
                .collect();

            let (pawns, walls) = self.split_pawns_walls(&tied);
            let on_path: Vec<NodeId> = pawns
                .iter()
                .copied()
                .filter(|&child| self.nodes[child].follows_shortest_path)
                .collect();

            id = if !on_path.is_empty() {
                on_path[rng.usize(..on_path.len())]
            } else if !pawns.is_empty() {
                pawns[rng.usize(..pawns.len())]
            } else {
                walls[rng.usize(..walls.len())]
            };
        }
    }

    /// Expand a leaf and return the child to evaluate this iteration,
    /// chosen uniformly among the children just created.
    ///
    /// Terminal nodes expand to themselves. A mover with no walls left and
    /// an intact shortest path gets a single forced child advancing along
    /// that path, which collapses the branching factor for the rest of the
    /// game. Returns `None` if no child could be created.
    pub fn expand(&mut self, id: NodeId, rng: &mut Rng) -> Option<NodeId> {
        let board = self.nodes[id].board.clone();
        if board.is_finished() {
            return Some(id);
        }

        let opponent = self.nodes[id].player;
        let mover = 1 - opponent;
        let path = board.shortest_path(mover).ok();

        if board.nb_walls[mover] == 0 {
            if let Some(step) = path.as_ref().and_then(|p| p.first().copied()) {
                let action = Action::Pawn(step);
                let mut next = board.clone();
                next.play_action_unchecked(action, mover);
                return Some(self.add_child(id, mover, action, true, next));
            }
        }

        let first_step = path.as_ref().and_then(|p| p.first().copied());
        for action in board.legal_pawn_moves(mover) {
            let mut next = board.clone();
            next.play_action_unchecked(action, mover);
            let follows = first_step == Some(action.cell());
            self.add_child(id, mover, action, follows, next);
        }

        if board.nb_walls[mover] > 0 {
            for (horizontal, row, col) in interesting_walls(&board, board.pawns[opponent]) {
                if !board.wall_placement_legal((row, col), horizontal) {
                    continue;
                }
                let action = if horizontal {
                    Action::HorizontalWall((row, col))
                } else {
                    Action::VerticalWall((row, col))
                };
                let mut next = board.clone();
                next.play_action_unchecked(action, mover);
                self.add_child(id, mover, action, false, next);
            }
        }

        let children = &self.nodes[id].children;
        if children.is_empty() {
            None
        } else {
            Some(children[rng.usize(..children.len())])
        }
    }

    /// Heuristic evaluation in lieu of a rollout: compare both players'
    /// safe shortest-path lengths and score 1 if the root's mover is at
    /// least level, 0 otherwise. The perspective is always the root's
    /// mover, so backpropagation is consistent regardless of whose turn
    /// the node represents.
    pub fn evaluate(&self, id: NodeId) -> Result<u32, GameError> {
        let node = &self.nodes[id];
        let mover = 1 - node.player;
        let opponent = node.player;

        let mover_steps = node.board.min_steps_safe(mover)?;
        let opponent_steps = node.board.min_steps_safe(opponent)?;

        let root_mover = 1 - self.nodes[ROOT].player;
        let won = if root_mover == mover {
            mover_steps <= opponent_steps
        } else {
            opponent_steps <= mover_steps
        };
        Ok(won as u32)
    }

    /// Propagate an evaluation result from a node up to the root.
    pub fn backpropagate(&mut self, id: NodeId, result: u32) {
        let mut current = Some(id);
        while let Some(i) = current {
            self.nodes[i].wins += result;
            self.nodes[i].visits += 1;
            current = self.nodes[i].parent;
        }
    }

    /// Pick the action to play: most-visited root children, narrowed to
    /// maximum distance gain, then resolved between the pawn and wall
    /// classes.
    ///
    /// A wall is preferred over a pawn move only while the mover's own
    /// distance to goal stays at least as large as the opponent's after
    /// the wall, i.e. when racing cannot win anyway. Returns `Ok(None)`
    /// when the relevant candidate class is empty.
    pub fn best_action(&self, rng: &mut Rng) -> Result<Option<Action>, GameError> {
        let root = &self.nodes[ROOT];
        let mover = 1 - root.player;
        let opponent = root.player;

        if root.children.is_empty() {
            return Ok(None);
        }

        let max_visits = root
            .children
            .iter()
            .map(|&child| self.nodes[child].visits)
            .fold(0, u32::max);
        let most_visited: Vec<NodeId> = root
            .children
            .iter()
            .copied()
            .filter(|&child| self.nodes[child].visits == max_visits)
            .collect();

        let root_mover_steps = root.board.min_steps_safe(mover)? as i64;
        let root_opponent_steps = root.board.min_steps_safe(opponent)? as i64;
        let mut gains = Vec::with_capacity(most_visited.len());
        for &id in &most_visited {
            gains.push(self.node_gain(id, mover, opponent, root_mover_steps, root_opponent_steps)?);
        }
        let max_gain = gains.iter().copied().fold(i64::MIN, i64::max);
        let best: Vec<NodeId> = most_visited
            .iter()
            .copied()
            .zip(gains)
            .filter(|&(_, gain)| gain == max_gain)
            .map(|(id, _)| id)
            .collect();

        let (pawns, walls) = self.split_pawns_walls(&best);

        if walls.is_empty() || root.board.nb_walls[mover] == 0 {
            return Ok(self.pick(&pawns, rng).and_then(|id| self.nodes[id].action));
        }
        if pawns.is_empty() {
            return Ok(self.pick(&walls, rng).and_then(|id| self.nodes[id].action));
        }

        let wall_id = walls[rng.usize(..walls.len())];
        let pawn_id = pawns[rng.usize(..pawns.len())];
        let wall_board = &self.nodes[wall_id].board;
        if wall_board.min_steps_safe(mover)? >= wall_board.min_steps_safe(opponent)? {
            Ok(self.nodes[wall_id].action)
        } else {
            Ok(self.nodes[pawn_id].action)
        }
    }

    /// Distance gain of a root child: pawn moves are rewarded for
    /// shortening the mover's path, walls for lengthening the opponent's
    /// path more than the mover's own.
    fn node_gain(
        &self,
        id: NodeId,
        mover: usize,
        opponent: usize,
        root_mover_steps: i64,
        root_opponent_steps: i64,
    ) -> Result<i64, GameError> {
        let node = &self.nodes[id];
        if matches!(node.action, Some(Action::Pawn(_))) {
            Ok(root_mover_steps - node.board.min_steps_safe(mover)? as i64)
        } else {
            let opponent_gain = node.board.min_steps_safe(opponent)? as i64 - root_opponent_steps;
            let mover_gain = node.board.min_steps_safe(mover)? as i64 - root_mover_steps;
            Ok(opponent_gain - mover_gain)
        }
    }

    fn split_pawns_walls(&self, ids: &[NodeId]) -> (Vec<NodeId>, Vec<NodeId>) {
        ids.iter()
            .copied()
            .partition(|&id| matches!(self.nodes[id].action, Some(Action::Pawn(_))))
    }

    fn pick(&self, ids: &[NodeId], rng: &mut Rng) -> Option<NodeId> {
        if ids.is_empty() {
            None
        } else {
            Some(ids[rng.usize(..ids.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn board_with(pawns: [Cell; 2], goals: [i8; 2], nb_walls: [i32; 2]) -> Board {
        Board {
            pawns,
            goals,
            nb_walls,
            horiz_walls: Vec::new(),
            verti_walls: Vec::new(),
        }
    }

    fn run_iterations(tree: &mut Tree, rng: &mut Rng, n: usize) {
        for _ in 0..n {
            let leaf = tree.select(rng);
            let expanded = tree.expand(leaf, rng).unwrap();
            let result = tree.evaluate(expanded).unwrap();
            tree.backpropagate(expanded, result);
        }
    }

    #[test]
    fn test_root_represents_the_opponent() {
        let tree = Tree::new(0, Board::new());
        assert_eq!(tree.root().player, 1);
        assert!(tree.root().action.is_none());
        assert!(tree.root().children.is_empty());
    }

    #[test]
    fn test_expansion_of_the_initial_position() {
        let mut tree = Tree::new(0, Board::new());
        let mut rng = Rng::with_seed(1);
        let child = tree.expand(ROOT, &mut rng).unwrap();
        assert_ne!(child, ROOT);

        // 3 pawn moves plus the 4 in-bounds wall candidates around the
        // opponent at (8,4).
        assert_eq!(tree.root().children.len(), 7);
        let on_path: Vec<&Node> = tree
            .root()
            .children
            .iter()
            .map(|&c| tree.node(c))
            .filter(|n| n.follows_shortest_path)
            .collect();
        assert_eq!(on_path.len(), 1);
        assert_eq!(on_path[0].action, Some(Action::Pawn((1, 4))));

        // Child boards are independent clones; the root board is untouched.
        assert_eq!(tree.root().board, Board::new());
    }

    #[test]
    fn test_terminal_node_expands_to_itself() {
        let board = board_with([(8, 4), (0, 4)], [8, 0], [10, 10]);
        assert!(board.is_finished());
        let mut tree = Tree::new(0, board);
        let mut rng = Rng::with_seed(1);
        assert_eq!(tree.expand(ROOT, &mut rng), Some(ROOT));
        assert!(tree.root().children.is_empty());
    }

    #[test]
    fn test_forced_path_child_when_out_of_walls() {
        let board = board_with([(0, 4), (8, 4)], [8, 0], [0, 10]);
        let mut tree = Tree::new(0, board);
        let mut rng = Rng::with_seed(1);
        let child = tree.expand(ROOT, &mut rng).unwrap();

        assert_eq!(tree.root().children, vec![child]);
        let node = tree.node(child);
        assert!(node.follows_shortest_path);
        assert_eq!(node.action, Some(Action::Pawn((1, 4))));
        assert_eq!(node.board.pawns[0], (1, 4));
    }

    #[test]
    fn test_no_wall_children_for_a_wall_less_mover() {
        // Row 7 is walled off except at the opponent-occupied (8,8), so the
        // mover has no path and the forced-path branch cannot fire. With no
        // walls left either, expansion must still only produce pawn
        // children; a wall action would be outside the mover's legal set.
        let board = Board {
            pawns: [(7, 8), (8, 8)],
            goals: [8, 0],
            nb_walls: [0, 10],
            horiz_walls: vec![(7, 0), (7, 2), (7, 4), (7, 6)],
            verti_walls: vec![(7, 7)],
        };
        assert!(board.shortest_path(0).is_err());

        let mut tree = Tree::new(0, board.clone());
        let mut rng = Rng::with_seed(2);
        let child = tree.expand(ROOT, &mut rng).unwrap();

        let legal = board.legal_actions(0);
        for &id in &tree.root().children {
            let action = tree.node(id).action.unwrap();
            assert!(action.is_pawn_move());
            assert!(legal.contains(&action));
        }
        assert_eq!(tree.node(child).action, Some(Action::Pawn((6, 8))));
    }

    #[test]
    fn test_uct_prefers_unvisited_children() {
        let mut tree = Tree::new(0, Board::new());
        let mut rng = Rng::with_seed(3);
        run_iterations(&mut tree, &mut rng, 1);

        for &child in &tree.root().children {
            if tree.node(child).visits == 0 {
                assert_eq!(tree.uct_value(child), f64::INFINITY);
            } else {
                assert!(tree.uct_value(child).is_finite());
            }
        }

        // With unvisited children still present, selection must descend
        // into a pawn child (the shortest-path tie-break).
        let selected = tree.select(&mut rng);
        assert!(matches!(tree.node(selected).action, Some(Action::Pawn(_))));
    }

    #[test]
    fn test_evaluation_is_relative_to_the_root_mover() {
        // Player 0 is one step from its goal; player 1 is eight away.
        let board = board_with([(7, 2), (8, 6)], [8, 0], [10, 10]);

        let tree = Tree::new(0, board.clone());
        assert_eq!(tree.evaluate(ROOT), Ok(1));

        let tree = Tree::new(1, board);
        assert_eq!(tree.evaluate(ROOT), Ok(0));
    }

    #[test]
    fn test_backpropagation_accounting() {
        let mut tree = Tree::new(0, Board::new());
        let mut rng = Rng::with_seed(7);
        let iterations = 30;
        run_iterations(&mut tree, &mut rng, iterations);

        // Root visits count completed iterations.
        assert_eq!(tree.root().visits, iterations as u32);

        // Wins never exceed visits, and a parent is visited at least as
        // often as all of its children together.
        for id in 0..tree.len() {
            let node = tree.node(id);
            assert!(node.wins <= node.visits);
            let child_sum: u32 = node.children.iter().map(|&c| tree.node(c).visits).sum();
            assert!(node.visits >= child_sum);
        }
    }

    #[test]
    fn test_best_action_is_legal() {
        let board = Board::new();
        let mut tree = Tree::new(0, board.clone());
        let mut rng = Rng::with_seed(11);
        run_iterations(&mut tree, &mut rng, 40);

        let action = tree.best_action(&mut rng).unwrap().unwrap();
        assert!(board.legal_actions(0).contains(&action));
    }

    #[test]
    fn test_best_action_with_no_walls_is_the_path_step() {
        let board = board_with([(3, 4), (8, 0)], [8, 0], [0, 0]);
        let mut tree = Tree::new(0, board);
        let mut rng = Rng::with_seed(5);
        run_iterations(&mut tree, &mut rng, 1);

        let action = tree.best_action(&mut rng).unwrap().unwrap();
        assert_eq!(action, Action::Pawn((4, 4)));
    }

    #[test]
    fn test_best_action_on_empty_root_is_none() {
        let board = board_with([(8, 4), (0, 4)], [8, 0], [10, 10]);
        let tree = Tree::new(0, board);
        let mut rng = Rng::with_seed(1);
        assert_eq!(tree.best_action(&mut rng), Ok(None));
    }
}
