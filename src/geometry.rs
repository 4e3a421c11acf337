//! Planar positions, the four unit directions, and line rasterization.
//!
//! Columns grow to the right and rows grow downwards, so `(0, 0)` is the
//! top left corner of the board.

use std::fmt;

use crate::error::{Error, Result};

/// A cell coordinate. Signed so that off-board candidates can be represented
/// and rejected by a bounds check instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The neighbouring position one step in `direction`.
    #[inline]
    pub const fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.offset();
        Self::new(self.col + dc, self.row + dr)
    }

    pub const fn manhattan(self, other: Position) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// One of the four orthogonal unit steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every direction, in the order moves are generated.
    ///
    /// Breadth-first expansion order depends on this sequence, so it must not
    /// be reordered.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The `(col, row)` delta of a single step.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The direction in which `to` lies as seen from `from`.
    ///
    /// Fails with [`Error::InvalidGeometry`] unless the two positions are
    /// exactly one orthogonal step apart.
    pub fn between(from: Position, to: Position) -> Result<Self> {
        match (to.col - from.col, to.row - from.row) {
            (0, -1) => Ok(Direction::Up),
            (0, 1) => Ok(Direction::Down),
            (-1, 0) => Ok(Direction::Left),
            (1, 0) => Ok(Direction::Right),
            _ => Err(Error::InvalidGeometry { from, to }),
        }
    }
}

/// Iterator over the cells a straight line from `start` to `end` passes
/// through, both endpoints included (Bresenham's algorithm).
///
/// Both error comparisons are strict, and a column step that lands on `end`
/// ends the line without a row step.
#[derive(Debug, Clone)]
pub struct Line {
    current: Position,
    end: Position,
    dx: i32,
    dy: i32,
    step_col: i32,
    step_row: i32,
    error: i32,
    done: bool,
}

impl Line {
    pub fn new(start: Position, end: Position) -> Self {
        let dx = (end.col - start.col).abs();
        let dy = (end.row - start.row).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            step_col: if start.col < end.col { 1 } else { -1 },
            step_row: if start.row < end.row { 1 } else { -1 },
            error: dx - dy,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.done {
            return None;
        }
        let point = self.current;
        if point == self.end {
            self.done = true;
            return Some(point);
        }

        let doubled = 2 * self.error;
        if doubled > -self.dy {
            self.error -= self.dy;
            self.current.col += self.step_col;
            if self.current == self.end {
                return Some(point);
            }
        }
        if doubled < self.dx {
            self.error += self.dx;
            self.current.row += self.step_row;
        }
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_follows_offsets() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Direction::Up), Position::new(2, 1));
        assert_eq!(origin.step(Direction::Down), Position::new(2, 3));
        assert_eq!(origin.step(Direction::Left), Position::new(1, 2));
        assert_eq!(origin.step(Direction::Right), Position::new(3, 2));
    }

    #[test]
    fn test_between_inverts_step() {
        let origin = Position::new(4, 7);
        for direction in Direction::ALL {
            let neighbour = origin.step(direction);
            assert_eq!(
                Direction::between(origin, neighbour).unwrap(),
                direction,
                "Stepping {direction:?} should be recovered from the delta"
            );
        }
    }

    #[test]
    fn test_between_rejects_non_unit_deltas() {
        let origin = Position::new(1, 1);
        for other in [
            Position::new(1, 1),
            Position::new(2, 2),
            Position::new(3, 1),
            Position::new(1, -1),
        ] {
            assert!(
                matches!(
                    Direction::between(origin, other),
                    Err(Error::InvalidGeometry { .. })
                ),
                "{origin} -> {other} is not a unit step"
            );
        }
    }

    #[test]
    fn test_line_single_point() {
        let p = Position::new(3, 3);
        assert_eq!(Line::new(p, p).collect::<Vec<_>>(), vec![p]);
    }

    #[test]
    fn test_line_horizontal_and_vertical() {
        let horizontal: Vec<_> = Line::new(Position::new(0, 1), Position::new(3, 1)).collect();
        assert_eq!(
            horizontal,
            vec![
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(3, 1),
            ]
        );

        let vertical: Vec<_> = Line::new(Position::new(2, 3), Position::new(2, 0)).collect();
        assert_eq!(
            vertical,
            vec![
                Position::new(2, 3),
                Position::new(2, 2),
                Position::new(2, 1),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_line_diagonal() {
        let diagonal: Vec<_> = Line::new(Position::new(0, 0), Position::new(2, 2)).collect();
        assert_eq!(
            diagonal,
            vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]
        );
    }

    #[test]
    fn test_line_is_connected_and_ends_once() {
        let start = Position::new(0, 4);
        let end = Position::new(7, 1);
        let points: Vec<_> = Line::new(start, end).collect();

        assert_eq!(points.first(), Some(&start));
        assert_eq!(points.last(), Some(&end));
        assert_eq!(points.len(), 8, "A shallow line visits one cell per column");
        assert_eq!(points.iter().filter(|&&p| p == end).count(), 1);
        for pair in points.windows(2) {
            assert!(
                pair[0].col.abs_diff(pair[1].col) <= 1 && pair[0].row.abs_diff(pair[1].row) <= 1,
                "Consecutive points {} and {} must touch",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_line_tie_breaks() {
        let steep: Vec<_> = Line::new(Position::new(0, 0), Position::new(1, 2)).collect();
        assert_eq!(
            steep,
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(1, 2)]
        );

        let shallow: Vec<_> = Line::new(Position::new(1, 0), Position::new(3, 1)).collect();
        assert_eq!(
            shallow,
            vec![Position::new(1, 0), Position::new(2, 0), Position::new(3, 1)]
        );
    }

    #[test]
    fn test_line_known_rasterization() {
        let points: Vec<_> = Line::new(Position::new(0, 4), Position::new(7, 1)).collect();
        assert_eq!(
            points,
            vec![
                Position::new(0, 4),
                Position::new(1, 4),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(4, 2),
                Position::new(5, 2),
                Position::new(6, 1),
                Position::new(7, 1),
            ]
        );
    }
}
