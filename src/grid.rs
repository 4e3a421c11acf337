//! Board representation and the single-character marker alphabet.
//!
//! The board is a flat row-major vector of [`Cell`]s, indexed by
//! `row * cols + col`. Markers are only converted to and from characters at
//! the text boundary ([`Cell::from_token`] and the `Display` impls).

use std::fmt;

use crate::error::{Error, Result};
use crate::geometry::{Direction, Position};

/// The contents of one board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Open,
    Wall,
    /// A wriggler head; the direction points at the next segment.
    Head(Direction),
    /// A body segment; the direction points at the next segment towards the tail.
    Body(Direction),
    /// A wriggler tail, which also carries the wriggler's id.
    Tail(u32),
}

impl Cell {
    /// Parses one whitespace-delimited token of the puzzle format.
    pub fn from_token(token: &str) -> Option<Self> {
        let cell = match token {
            "e" => Cell::Open,
            "x" => Cell::Wall,
            "U" => Cell::Head(Direction::Up),
            "R" => Cell::Head(Direction::Right),
            "D" => Cell::Head(Direction::Down),
            "L" => Cell::Head(Direction::Left),
            "^" => Cell::Body(Direction::Up),
            ">" => Cell::Body(Direction::Right),
            "v" => Cell::Body(Direction::Down),
            "<" => Cell::Body(Direction::Left),
            // tail ids are written without leading zeros
            _ if token == "0"
                || (!token.starts_with('0') && token.bytes().all(|b| b.is_ascii_digit())) =>
            {
                Cell::Tail(token.parse().ok()?)
            }
            _ => return None,
        };
        Some(cell)
    }

    #[inline]
    pub fn is_open(self) -> bool {
        self == Cell::Open
    }

    /// Whether this cell belongs to some wriggler.
    #[inline]
    pub fn is_wriggler(self) -> bool {
        matches!(self, Cell::Head(_) | Cell::Body(_) | Cell::Tail(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self {
            Cell::Open => 'e',
            Cell::Wall => 'x',
            Cell::Head(Direction::Up) => 'U',
            Cell::Head(Direction::Right) => 'R',
            Cell::Head(Direction::Down) => 'D',
            Cell::Head(Direction::Left) => 'L',
            Cell::Body(Direction::Up) => '^',
            Cell::Body(Direction::Right) => '>',
            Cell::Body(Direction::Down) => 'v',
            Cell::Body(Direction::Left) => '<',
            Cell::Tail(id) => return write!(f, "{id}"),
        };
        write!(f, "{marker}")
    }
}

/// Largest number of columns or rows a board may have, so that every cell
/// has an `i32` coordinate.
pub const MAX_DIMENSION: usize = i32::MAX as usize;

/// A fixed-size board.
///
/// Grids are plain values: the search never mutates a grid that another node
/// can see, it clones first. Two grids compare equal exactly when every marker
/// matches, which makes a grid its own canonical state key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-open board.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Open; cols * rows],
        }
    }

    /// Builds a board from row-major cells.
    ///
    /// Returns `None` if the cell count does not match the dimensions.
    pub fn from_cells(cols: usize, rows: usize, cells: Vec<Cell>) -> Option<Self> {
        (cols <= MAX_DIMENSION && rows <= MAX_DIMENSION && cols.checked_mul(rows)? == cells.len())
            .then_some(Self { cols, rows, cells })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get the internal index of a position, or `None` if it is out of bounds.
    #[inline]
    fn idx(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.row as usize * self.cols + pos.col as usize)
    }

    fn checked_idx(&self, pos: Position) -> Result<usize> {
        self.idx(pos).ok_or(Error::OutOfBounds {
            position: pos,
            cols: self.cols,
            rows: self.rows,
        })
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.cols
            && (pos.row as usize) < self.rows
    }

    /// The cell at `pos`.
    pub fn tile(&self, pos: Position) -> Result<Cell> {
        self.checked_idx(pos).map(|idx| self.cells[idx])
    }

    /// Whether `pos` is on the board and holds the open marker.
    #[inline]
    pub fn is_open(&self, pos: Position) -> bool {
        self.idx(pos).is_some_and(|idx| self.cells[idx].is_open())
    }

    /// Resets the cell at `pos` to open.
    pub fn clear(&mut self, pos: Position) -> Result<()> {
        self.set_marker(pos, Cell::Open)
    }

    /// Overwrites the cell at `pos` with an arbitrary marker.
    pub fn set_marker(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let idx = self.checked_idx(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Writes `cell` at `pos`, refusing to overwrite anything but an open cell.
    pub(crate) fn occupy(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let idx = self.checked_idx(pos)?;
        if !self.cells[idx].is_open() {
            return Err(Error::Overlap { position: pos });
        }
        self.cells[idx] = cell;
        Ok(())
    }

    /// The goal corner.
    pub fn lower_right_corner(&self) -> Position {
        Position::new(self.cols as i32 - 1, self.rows as i32 - 1)
    }

    /// Iterates over every position with its cell, column by column from
    /// the left, top to bottom within a column.
    pub fn positions_by_column(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        (0..self.cols).flat_map(move |col| {
            (0..self.rows).map(move |row| {
                (
                    Position::new(col as i32, row as i32),
                    self.cells[row * self.cols + col],
                )
            })
        })
    }
}

/// Renders `rows` lines of `cols` space-separated markers, without a trailing
/// newline.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.cells.chunks(self.cols.max(1)).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for (col_idx, cell) in row.iter().enumerate() {
                if col_idx > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        for token in ["e", "x", "U", "R", "D", "L", "^", ">", "v", "<", "0", "7", "12"] {
            let cell = Cell::from_token(token).expect("token should parse");
            assert_eq!(cell.to_string(), token, "Marker {token} should render back");
        }
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        for token in ["", "a", "-1", "ee", "1x", "+"] {
            assert_eq!(Cell::from_token(token), None, "{token:?} is not a marker");
        }
    }

    #[test]
    fn test_rejects_leading_zero_tail_ids() {
        for token in ["00", "007", "01"] {
            assert_eq!(Cell::from_token(token), None, "{token:?} is not a marker");
        }
        assert_eq!(Cell::from_token("10"), Some(Cell::Tail(10)));
    }

    #[test]
    fn test_clear_then_set_marker() {
        let mut grid = Grid::new(3, 2);
        for row in 0..2 {
            for col in 0..3 {
                let pos = Position::new(col, row);
                grid.clear(pos).unwrap();
                assert_eq!(grid.tile(pos).unwrap(), Cell::Open);
                grid.set_marker(pos, Cell::Body(Direction::Left)).unwrap();
                assert_eq!(grid.tile(pos).unwrap(), Cell::Body(Direction::Left));
                grid.clear(pos).unwrap();
                assert_eq!(grid.tile(pos).unwrap(), Cell::Open);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut grid = Grid::new(3, 2);
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(3, 0),
            Position::new(0, 2),
        ] {
            assert!(!grid.in_bounds(pos));
            assert!(!grid.is_open(pos));
            assert!(matches!(grid.tile(pos), Err(Error::OutOfBounds { .. })));
            assert!(matches!(grid.clear(pos), Err(Error::OutOfBounds { .. })));
        }
    }

    #[test]
    fn test_occupy_refuses_overlap() {
        let mut grid = Grid::new(2, 2);
        let pos = Position::new(1, 0);
        grid.occupy(pos, Cell::Tail(3)).unwrap();
        assert!(matches!(
            grid.occupy(pos, Cell::Head(Direction::Up)),
            Err(Error::Overlap { .. })
        ));
        assert_eq!(grid.tile(pos).unwrap(), Cell::Tail(3));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Grid::new(2, 2);
        let mut copy = original.clone();
        copy.set_marker(Position::new(0, 0), Cell::Wall).unwrap();
        assert!(original.is_open(Position::new(0, 0)));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_lower_right_corner() {
        assert_eq!(Grid::new(3, 3).lower_right_corner(), Position::new(2, 2));
        assert_eq!(Grid::new(5, 2).lower_right_corner(), Position::new(4, 1));
    }

    #[test]
    fn test_display_layout() {
        let cells = ["e", "e", "x", "e", "x", "e", "0", "<", "L"]
            .iter()
            .map(|t| Cell::from_token(t).unwrap())
            .collect();
        let grid = Grid::from_cells(3, 3, cells).unwrap();
        assert_eq!(grid.to_string(), "e e x\ne x e\n0 < L");
    }

    #[test]
    fn test_positions_by_column() {
        let cells = ["e", "x", "U", "0", "e", "e"]
            .iter()
            .map(|t| Cell::from_token(t).unwrap())
            .collect();
        let grid = Grid::from_cells(3, 2, cells).unwrap();
        let positions: Vec<_> = grid.positions_by_column().collect();
        assert_eq!(
            positions,
            vec![
                (Position::new(0, 0), Cell::Open),
                (Position::new(0, 1), Cell::Tail(0)),
                (Position::new(1, 0), Cell::Wall),
                (Position::new(1, 1), Cell::Open),
                (Position::new(2, 0), Cell::Head(Direction::Up)),
                (Position::new(2, 1), Cell::Open),
            ]
        );
    }
}
