//! World state: the board plus every wriggler on it.

use crate::error::{Error, Result};
use crate::geometry::{Direction, Line, Position};
use crate::grid::{Cell, Grid};
use crate::moves::{End, Move};
use crate::pieces::{find_wrigglers, move_wriggler, Wriggler};

/// The id of the wriggler that has to reach the goal corner.
pub const BLUE_ID: u32 = 0;

/// Heuristic cost of crossing an open cell, or one of the blue wriggler's own.
const OPEN_COST: u32 = 1;
/// Heuristic cost of crossing a wall.
const WALL_COST: u32 = 2;
/// Heuristic cost of crossing a cell held by another wriggler.
const WRIGGLER_COST: u32 = 3;

/// An immutable snapshot of the puzzle.
///
/// The heuristic is computed once on construction; producing a different
/// layout always goes through [`State::apply`], which builds a new state.
#[derive(Debug, Clone)]
pub struct State {
    grid: Grid,
    wrigglers: Vec<Wriggler>,
    blue: usize,
    heuristic: u32,
}

impl State {
    pub fn new(grid: Grid, wrigglers: Vec<Wriggler>) -> Result<Self> {
        let blue = wrigglers
            .iter()
            .position(|w| w.id() == BLUE_ID)
            .ok_or_else(|| {
                Error::extraction(
                    grid.lower_right_corner(),
                    format!("no wriggler has tail id {BLUE_ID}"),
                )
            })?;
        Ok(Self::with_blue(grid, wrigglers, blue))
    }

    /// Extracts the wrigglers drawn on `grid` and builds the state.
    pub fn from_grid(grid: Grid) -> Result<Self> {
        let wrigglers = find_wrigglers(&grid)?;
        Self::new(grid, wrigglers)
    }

    fn with_blue(grid: Grid, wrigglers: Vec<Wriggler>, blue: usize) -> Self {
        let heuristic = compute_heuristic(&grid, &wrigglers[blue]);
        Self {
            grid,
            wrigglers,
            blue,
            heuristic,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn wrigglers(&self) -> &[Wriggler] {
        &self.wrigglers
    }

    pub fn blue(&self) -> &Wriggler {
        &self.wrigglers[self.blue]
    }

    /// Estimated remaining cost; not admissible.
    #[inline]
    pub fn heuristic(&self) -> u32 {
        self.heuristic
    }

    /// Canonical key for duplicate detection.
    ///
    /// The rendered board determines every wriggler, so the grid alone
    /// identifies the state.
    pub fn key(&self) -> &Grid {
        &self.grid
    }

    /// Goal test: the blue wriggler's head or tail is on the lower right corner.
    pub fn blue_in_goal_corner(&self) -> bool {
        self.blue()
            .head_or_tail_at(self.grid.lower_right_corner())
    }

    /// Every legal move in generation order: wriggler by wriggler, then
    /// up, down, left, right, with the head candidate before the tail.
    pub fn actions(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.wrigglers.len() * 8);
        for wriggler in &self.wrigglers {
            self.wriggler_actions(wriggler, &mut moves);
        }
        moves
    }

    fn wriggler_actions(&self, wriggler: &Wriggler, moves: &mut Vec<Move>) {
        let id = wriggler.id();
        for direction in Direction::ALL {
            let head = wriggler.head_pos().step(direction);
            if self.grid.is_open(head) {
                moves.push(Move::new(id, End::Head, head));
            }
            let tail = wriggler.tail_pos().step(direction);
            if self.grid.is_open(tail) {
                moves.push(Move::new(id, End::Tail, tail));
            }
        }
    }

    /// Produces the state reached by `mv`.
    ///
    /// `mv` is expected to come from [`State::actions`]; anything else is a
    /// logic error and is reported instead of applied.
    pub fn apply(&self, mv: &Move) -> Result<State> {
        let index = self
            .wrigglers
            .iter()
            .position(|w| w.id() == mv.wriggler)
            .ok_or(Error::InvalidPieceReference { id: mv.wriggler })?;

        let (moved, grid) = move_wriggler(&self.wrigglers[index], mv, &self.grid)?;
        let mut wrigglers = self.wrigglers.clone();
        wrigglers[index] = moved;
        Ok(Self::with_blue(grid, wrigglers, self.blue))
    }
}

/// The smaller of the line costs from the blue head and tail to the goal.
fn compute_heuristic(grid: &Grid, blue: &Wriggler) -> u32 {
    let goal = grid.lower_right_corner();
    let head = line_cost(grid, blue, blue.head_pos(), goal);
    let tail = line_cost(grid, blue, blue.tail_pos(), goal);
    head.min(tail)
}

/// Sums the cell costs along the rasterized line, excluding the start cell.
fn line_cost(grid: &Grid, blue: &Wriggler, start: Position, goal: Position) -> u32 {
    Line::new(start, goal)
        .skip(1)
        .map(|pos| match grid.tile(pos) {
            Ok(Cell::Open) => OPEN_COST,
            Ok(Cell::Wall) | Err(_) => WALL_COST,
            Ok(_) if blue.chain().any(|own| own == pos) => OPEN_COST,
            Ok(_) => WRIGGLER_COST,
        })
        .sum()
}
