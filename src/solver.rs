//! Search algorithms over wriggler states.
//!
//! Breadth-first and best-first search keep every generated node in a
//! [`SearchTree`] arena; nodes refer to their parent by [`NodeId`], so
//! recovering the move sequence is a walk up the handles. Iterative
//! deepening keeps only the current path on an explicit stack.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::grid::Grid;
use crate::moves::Move;
use crate::state::State;

/// Default ceiling on node expansions per run.
pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000_000;

/// Bounds that guarantee a run terminates on unsolvable puzzles.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

/// Handle of a node inside a [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct SearchNode {
    pub state: State,
    pub parent: Option<NodeId>,
    /// The move that produced this node from its parent.
    pub action: Option<Move>,
    /// Moves taken from the root; every move costs 1.
    pub path_cost: u32,
    /// `path_cost` plus the state's heuristic.
    pub total_cost: u32,
}

/// Arena owning every node generated during one run.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Creates a tree holding only `root`.
    pub fn new(root: State) -> (Self, NodeId) {
        let total_cost = root.heuristic();
        let tree = Self {
            nodes: vec![SearchNode {
                state: root,
                parent: None,
                action: None,
                path_cost: 0,
                total_cost,
            }],
        };
        (tree, NodeId(0))
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Generates one child per legal move of `id`, in move order.
    pub fn expand(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let parent = &self.nodes[id.0];
        let path_cost = parent.path_cost + 1;
        let children = parent
            .state
            .actions()
            .into_iter()
            .map(|mv| Ok((mv, parent.state.apply(&mv)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(children
            .into_iter()
            .map(|(mv, state)| {
                let total_cost = path_cost + state.heuristic();
                self.nodes.push(SearchNode {
                    state,
                    parent: Some(id),
                    action: Some(mv),
                    path_cost,
                    total_cost,
                });
                NodeId(self.nodes.len() - 1)
            })
            .collect())
    }

    /// The moves leading from the root to `id`, root first.
    pub fn backtrack(&self, id: NodeId) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.map(|id| self.node(id)) {
            moves.extend(node.action);
            current = node.parent;
        }
        moves.reverse();
        moves
    }

    fn solution(&self, id: NodeId) -> Solution {
        let node = self.node(id);
        Solution {
            moves: self.backtrack(id),
            grid: node.state.grid().clone(),
            path_cost: node.path_cost,
        }
    }
}

/// A complete path from the initial layout to a goal layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Move>,
    /// The board once every move has been applied.
    pub grid: Grid,
    pub path_cost: u32,
}

/// One line per move, then the final board.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mv in &self.moves {
            writeln!(f, "{mv}")?;
        }
        write!(f, "{}", self.grid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(Solution),
    /// Every reachable node was examined without meeting the goal.
    Exhausted,
    /// The expansion ceiling stopped the run.
    LimitReached,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
    /// The depth limit that produced the result (iterative deepening only).
    pub depth_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub stats: SearchStats,
}

impl Report {
    fn new(outcome: Outcome, stats: SearchStats) -> Self {
        Self { outcome, stats }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            Outcome::Found(solution) => Some(solution),
            _ => None,
        }
    }
}

/// A search strategy, erased behind a trait object so callers can pick one
/// at runtime.
pub trait Search {
    fn name(&self) -> &'static str;
    fn search(&self, root: State, limits: &SearchLimits) -> Result<Report>;
}

/// Runs `search` from `root`, logging the start and end of the run.
pub fn run(search: &dyn Search, root: State, limits: &SearchLimits) -> Result<Report> {
    info!(
        event = "search_start",
        algorithm = search.name(),
        wrigglers = root.wrigglers().len(),
        heuristic = root.heuristic(),
        max_expansions = limits.max_expansions,
    );

    let report = search.search(root, limits)?;

    match &report.outcome {
        Outcome::Found(solution) => info!(
            event = "search_end",
            outcome = "found",
            path_cost = solution.path_cost,
            expanded = report.stats.expanded,
            generated = report.stats.generated,
        ),
        Outcome::Exhausted => info!(
            event = "search_end",
            outcome = "exhausted",
            expanded = report.stats.expanded,
            generated = report.stats.generated,
        ),
        Outcome::LimitReached => warn!(
            event = "expansion_limit",
            expanded = report.stats.expanded,
            generated = report.stats.generated,
        ),
    }

    Ok(report)
}

/// FIFO tree search.
///
/// Without `prune_duplicates` a layout is expanded every time it is reached,
/// which is exponential on puzzles with reversible moves but reproduces the
/// expansion order of plain tree search exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst {
    pub prune_duplicates: bool,
}

impl Search for BreadthFirst {
    fn name(&self) -> &'static str {
        "breadth-first"
    }

    fn search(&self, root: State, limits: &SearchLimits) -> Result<Report> {
        let (mut tree, root) = SearchTree::new(root);
        let mut stats = SearchStats::default();
        let mut frontier = VecDeque::from([root]);
        let mut explored: FxHashSet<Grid> = FxHashSet::default();

        while let Some(id) = frontier.pop_front() {
            let state = &tree.node(id).state;
            if state.blue_in_goal_corner() {
                return Ok(Report::new(Outcome::Found(tree.solution(id)), stats));
            }
            if self.prune_duplicates && !explored.insert(state.key().clone()) {
                continue;
            }
            if stats.expanded >= limits.max_expansions {
                return Ok(Report::new(Outcome::LimitReached, stats));
            }

            stats.expanded += 1;
            let children = tree.expand(id)?;
            stats.generated += children.len();
            frontier.extend(children);
        }

        Ok(Report::new(Outcome::Exhausted, stats))
    }
}

/// Depth-first search restarted with depth limits 1, 2, 3, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct IterativeDeepening;

/// Result of a single depth-limited pass.
enum Pass {
    Found(Solution),
    /// Some node sat on the depth limit, so a deeper pass may succeed.
    Cutoff,
    Exhausted,
    LimitReached,
}

/// A node on the current depth-first path with the moves not yet tried.
struct Frame {
    state: State,
    pending: std::vec::IntoIter<Move>,
}

impl Frame {
    fn new(state: State) -> Self {
        let pending = state.actions().into_iter();
        Self { state, pending }
    }
}

impl IterativeDeepening {
    fn depth_limited(
        root: &State,
        depth_limit: u32,
        stats: &mut SearchStats,
        limits: &SearchLimits,
    ) -> Result<Pass> {
        if root.blue_in_goal_corner() {
            return Ok(Pass::Found(Solution {
                moves: Vec::new(),
                grid: root.grid().clone(),
                path_cost: 0,
            }));
        }
        if stats.expanded >= limits.max_expansions {
            return Ok(Pass::LimitReached);
        }

        stats.expanded += 1;
        let mut stack = vec![Frame::new(root.clone())];
        let mut path: Vec<Move> = Vec::new();
        let mut cutoff = false;

        while let Some(frame) = stack.last_mut() {
            let Some(mv) = frame.pending.next() else {
                stack.pop();
                path.pop();
                continue;
            };
            let child = frame.state.apply(&mv)?;
            stats.generated += 1;
            path.push(mv);

            if child.blue_in_goal_corner() {
                let path_cost = path.len() as u32;
                return Ok(Pass::Found(Solution {
                    moves: path,
                    grid: child.grid().clone(),
                    path_cost,
                }));
            }
            if path.len() as u32 >= depth_limit {
                cutoff = true;
                path.pop();
                continue;
            }
            if stats.expanded >= limits.max_expansions {
                return Ok(Pass::LimitReached);
            }

            stats.expanded += 1;
            stack.push(Frame::new(child));
        }

        Ok(if cutoff { Pass::Cutoff } else { Pass::Exhausted })
    }
}

impl Search for IterativeDeepening {
    fn name(&self) -> &'static str {
        "iterative-deepening"
    }

    fn search(&self, root: State, limits: &SearchLimits) -> Result<Report> {
        let mut stats = SearchStats::default();

        for depth_limit in 1.. {
            debug!(event = "depth_limit", depth_limit, expanded = stats.expanded);
            stats.depth_limit = Some(depth_limit);

            let outcome = match Self::depth_limited(&root, depth_limit, &mut stats, limits)? {
                Pass::Found(solution) => Outcome::Found(solution),
                Pass::Cutoff => continue,
                Pass::Exhausted => Outcome::Exhausted,
                Pass::LimitReached => Outcome::LimitReached,
            };
            return Ok(Report::new(outcome, stats));
        }

        Ok(Report::new(Outcome::Exhausted, stats))
    }
}

/// How best-first search orders its frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Heuristic only.
    Greedy,
    /// Path cost plus heuristic.
    AStar,
}

/// Best-first graph search: a layout is expanded at most once.
///
/// The heuristic is not admissible, so neither ordering guarantees a
/// shortest solution.
#[derive(Debug, Clone, Copy)]
pub struct BestFirst {
    pub priority: Priority,
}

impl BestFirst {
    pub fn greedy() -> Self {
        Self {
            priority: Priority::Greedy,
        }
    }

    pub fn a_star() -> Self {
        Self {
            priority: Priority::AStar,
        }
    }

    fn score(&self, node: &SearchNode) -> u32 {
        match self.priority {
            Priority::Greedy => node.state.heuristic(),
            Priority::AStar => node.total_cost,
        }
    }
}

impl Search for BestFirst {
    fn name(&self) -> &'static str {
        match self.priority {
            Priority::Greedy => "greedy-best-first",
            Priority::AStar => "a-star",
        }
    }

    fn search(&self, root: State, limits: &SearchLimits) -> Result<Report> {
        let (mut tree, root) = SearchTree::new(root);
        let mut stats = SearchStats::default();
        let mut explored: FxHashSet<Grid> = FxHashSet::default();

        // ties go to the earliest inserted node
        let mut sequence = 0usize;
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((self.score(tree.node(root)), sequence, root)));

        while let Some(Reverse((_, _, id))) = frontier.pop() {
            let state = &tree.node(id).state;
            if state.blue_in_goal_corner() {
                return Ok(Report::new(Outcome::Found(tree.solution(id)), stats));
            }
            if !explored.insert(state.key().clone()) {
                continue;
            }
            if stats.expanded >= limits.max_expansions {
                return Ok(Report::new(Outcome::LimitReached, stats));
            }

            stats.expanded += 1;
            for child in tree.expand(id)? {
                stats.generated += 1;
                let node = tree.node(child);
                if explored.contains(node.state.key()) {
                    continue;
                }
                sequence += 1;
                frontier.push(Reverse((self.score(node), sequence, child)));
            }
        }

        Ok(Report::new(Outcome::Exhausted, stats))
    }
}
