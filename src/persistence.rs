//! Reading puzzle files and writing solution files.
//!
//! Puzzle format:
//! - line 1: `<cols> <rows> <wrigglers>`
//! - then `rows` lines of `cols` whitespace-separated markers
//!
//! Solution format (`<puzzle>.sln`):
//! - one `<id> <0 = head, 1 = tail> <col> <row>` line per move
//! - the final board, one line per row
//! - elapsed wall time in seconds
//! - total path cost

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid, MAX_DIMENSION};
use crate::solver::Solution;
use crate::state::State;

/// A parsed puzzle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub grid: Grid,
    /// The wriggler count announced by the header.
    pub declared_wrigglers: usize,
}

impl Puzzle {
    /// Extracts the wrigglers and builds the starting state.
    pub fn initial_state(&self) -> Result<State> {
        let state = State::from_grid(self.grid.clone())?;
        let found = state.wrigglers().len();
        if found != self.declared_wrigglers {
            warn!(
                declared = self.declared_wrigglers,
                found, "header wriggler count does not match the board"
            );
        }
        debug!(wrigglers = found, "extracted wrigglers");
        Ok(state)
    }
}

/// Reads and parses a puzzle file.
pub fn read_puzzle(path: &Path) -> Result<Puzzle> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let puzzle = parse_puzzle(&text)?;
    debug!(
        path = %path.display(),
        cols = puzzle.grid.cols(),
        rows = puzzle.grid.rows(),
        "read puzzle"
    );
    Ok(puzzle)
}

/// Parses puzzle text.
pub fn parse_puzzle(text: &str) -> Result<Puzzle> {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

    let (_, header) = lines
        .next()
        .ok_or_else(|| Error::parse(1, "missing header"))?;
    let header = header
        .split_whitespace()
        .map(str::parse::<usize>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::parse(1, format!("header must hold integers: {e}")))?;
    let &[cols, rows, declared_wrigglers] = header.as_slice() else {
        return Err(Error::parse(
            1,
            format!("header must hold 3 numbers, found {}", header.len()),
        ));
    };
    if cols == 0 || rows == 0 {
        return Err(Error::parse(1, "the board must be at least 1x1"));
    }
    if cols > MAX_DIMENSION || rows > MAX_DIMENSION {
        return Err(Error::parse(
            1,
            format!("board dimensions may not exceed {MAX_DIMENSION}"),
        ));
    }
    if cols.checked_mul(rows).is_none() {
        return Err(Error::parse(1, format!("a {cols}x{rows} board is too large")));
    }

    let mut cells = Vec::new();
    for row in 0..rows {
        let (line_no, line) = lines.next().ok_or_else(|| {
            Error::parse(row + 2, format!("expected {rows} rows, found {row}"))
        })?;
        let before = cells.len();
        for token in line.split_whitespace() {
            let cell = Cell::from_token(token)
                .ok_or_else(|| Error::parse(line_no, format!("unknown marker `{token}`")))?;
            cells.push(cell);
        }
        let found = cells.len() - before;
        if found != cols {
            return Err(Error::parse(
                line_no,
                format!("expected {cols} markers, found {found}"),
            ));
        }
    }

    if let Some((line_no, _)) = lines.find(|(_, line)| !line.trim().is_empty()) {
        return Err(Error::parse(
            line_no,
            format!("more rows than the {rows} declared"),
        ));
    }

    let grid = Grid::from_cells(cols, rows, cells)
        .ok_or_else(|| Error::parse(1, "cell count does not match the header"))?;
    Ok(Puzzle {
        grid,
        declared_wrigglers,
    })
}

/// Where the solution for `puzzle_path` is written by default.
pub fn solution_path(puzzle_path: &Path) -> PathBuf {
    let mut name = puzzle_path.as_os_str().to_owned();
    name.push(".sln");
    PathBuf::from(name)
}

/// Formats the full solution file contents.
pub fn format_solution(solution: &Solution, elapsed: Duration) -> String {
    format!(
        "{solution}\n{}\n{}\n",
        elapsed.as_secs_f64(),
        solution.path_cost
    )
}

/// Writes the solution file.
pub fn save(path: &Path, solution: &Solution, elapsed: Duration) -> Result<()> {
    fs::write(path, format_solution(solution, elapsed)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::moves::{End, Move};

    const PUZZLE: &str = "3 4 1\ne e e\n0 e e\n^ e e\nU e e\n";

    #[test]
    fn test_parse_puzzle() {
        let puzzle = parse_puzzle(PUZZLE).unwrap();
        assert_eq!(puzzle.declared_wrigglers, 1);
        assert_eq!(puzzle.grid.cols(), 3);
        assert_eq!(puzzle.grid.rows(), 4);
        assert_eq!(puzzle.grid.tile(Position::new(0, 3)).unwrap().to_string(), "U");
        assert_eq!(puzzle.grid.to_string(), "e e e\n0 e e\n^ e e\nU e e");

        let state = puzzle.initial_state().unwrap();
        assert_eq!(state.wrigglers().len(), 1);
        assert_eq!(state.blue().tail_pos(), Position::new(0, 1));
    }

    #[test]
    fn test_parse_tolerates_spacing_and_trailing_blank_lines() {
        let puzzle = parse_puzzle("2  1 1 \n R\t0 \n\n   \n").unwrap();
        assert_eq!(puzzle.grid.to_string(), "R 0");
    }

    #[test]
    fn test_parse_failures() {
        let cases = [
            ("", 1),
            ("3 4\ne e e", 1),
            ("3 4 1 9\ne e e", 1),
            ("3 a 1\ne e e", 1),
            ("0 2 1\n", 1),
            ("3 2 1\ne e e", 3),
            ("3 2 1\ne e e\ne e", 3),
            ("3 2 1\ne e e\ne e e e", 3),
            ("3 2 1\ne e e\ne q e", 3),
            ("3 1 1\ne e e\n\ne e e", 4),
        ];
        for (text, expected_line) in cases {
            match parse_puzzle(text) {
                Err(Error::Parse { line, .. }) => {
                    assert_eq!(line, expected_line, "Wrong line reported for {text:?}")
                }
                other => panic!("{text:?} should fail to parse, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_oversized_header_is_rejected() {
        for text in [
            "4000000000 4000000000 1\ne\n",
            "3000000000 1 1\ne\n",
            "18446744073709551615 18446744073709551615 1\ne\n",
        ] {
            assert!(
                matches!(parse_puzzle(text), Err(Error::Parse { line: 1, .. })),
                "{text:?} should be rejected at the header"
            );
        }
    }

    #[test]
    fn test_header_count_mismatch_is_not_fatal() {
        let puzzle = parse_puzzle("3 1 5\nR 0 e").unwrap();
        assert_eq!(puzzle.declared_wrigglers, 5);
        assert_eq!(puzzle.initial_state().unwrap().wrigglers().len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_puzzle(Path::new("definitely/not/here.pz")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_solution_path_appends_extension() {
        assert_eq!(
            solution_path(Path::new("puzzles/puzz1.pz")),
            PathBuf::from("puzzles/puzz1.pz.sln")
        );
    }

    #[test]
    fn test_format_solution() {
        let grid = parse_puzzle("3 2 1\ne e e\ne 0 L").unwrap().grid;
        let solution = Solution {
            moves: vec![
                Move::new(0, End::Head, Position::new(1, 1)),
                Move::new(0, End::Head, Position::new(2, 1)),
            ],
            grid,
            path_cost: 2,
        };
        assert_eq!(
            format_solution(&solution, Duration::from_millis(1500)),
            "0 0 1 1\n0 0 2 1\ne e e\ne 0 L\n1.5\n2\n"
        );
    }
}
