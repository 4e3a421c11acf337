//! Wrigglers Puzzle Solver Library
//!
//! Finds move sequences that bring the blue wriggler (id 0) to the lower
//! right corner of the board, using breadth-first, iterative-deepening or
//! best-first search.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod moves;
pub mod persistence;
pub mod pieces;
pub mod solver;
pub mod state;

pub use error::{Error, Result};
pub use grid::{Cell, Grid};
pub use moves::{End, Move};
pub use pieces::Wriggler;
pub use solver::{
    BestFirst, BreadthFirst, IterativeDeepening, Outcome, Report, Search, SearchLimits, Solution,
};
pub use state::State;
