//! Wriggler definitions, extraction from a board, and the accordion shift.
//!
//! A wriggler is a chain `head, body[0], .., body[n-1], tail` of orthogonally
//! adjacent cells. The head and every body segment carry the direction of
//! the next link towards the tail; the tail carries the wriggler's id.

use std::fmt;

use crate::error::{Error, Result};
use crate::geometry::{Direction, Position};
use crate::grid::{Cell, Grid};
use crate::moves::{End, Move};

/// A head or body link: where it is and where the next link lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub pos: Position,
    pub next: Direction,
}

/// The tail end of a wriggler, identified by its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tail {
    pub pos: Position,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Wriggler {
    pub head: Segment,
    /// Interior segments ordered from the head end to the tail end.
    pub body: Vec<Segment>,
    pub tail: Tail,
}

impl Wriggler {
    /// Builds a wriggler from its cell chain, head first and tail last,
    /// deriving every direction marker from the positions.
    pub fn from_chain(chain: &[Position], id: u32) -> Result<Self> {
        let (&tail_pos, links) = chain
            .split_last()
            .ok_or_else(|| Error::extraction(Position::new(0, 0), "empty chain"))?;
        let Some((&head_pos, _)) = links.split_first() else {
            return Err(Error::extraction(tail_pos, "a wriggler needs a head"));
        };

        let mut segments = chain
            .windows(2)
            .map(|pair| {
                Ok(Segment {
                    pos: pair[0],
                    next: Direction::between(pair[0], pair[1])?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let head = segments.remove(0);
        debug_assert_eq!(head.pos, head_pos);

        Ok(Self {
            head,
            body: segments,
            tail: Tail {
                pos: tail_pos,
                id,
            },
        })
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.tail.id
    }

    #[inline]
    pub fn head_pos(&self) -> Position {
        self.head.pos
    }

    #[inline]
    pub fn tail_pos(&self) -> Position {
        self.tail.pos
    }

    /// Whether either end sits on `pos`.
    pub fn head_or_tail_at(&self, pos: Position) -> bool {
        self.head.pos == pos || self.tail.pos == pos
    }

    /// Number of cells covered, ends included.
    pub fn cell_count(&self) -> usize {
        self.body.len() + 2
    }

    /// All covered positions, head first.
    pub fn chain(&self) -> impl DoubleEndedIterator<Item = Position> + '_ {
        std::iter::once(self.head.pos)
            .chain(self.body.iter().map(|segment| segment.pos))
            .chain(std::iter::once(self.tail.pos))
    }

    /// Each covered position paired with the marker drawn there.
    pub fn markers(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        std::iter::once((self.head.pos, Cell::Head(self.head.next)))
            .chain(
                self.body
                    .iter()
                    .map(|segment| (segment.pos, Cell::Body(segment.next))),
            )
            .chain(std::iter::once((self.tail.pos, Cell::Tail(self.tail.id))))
    }

    /// Returns the wriggler after sliding `mv.end` onto the move's
    /// destination.
    ///
    /// Every other link takes the old position of its neighbour on the moved
    /// side, so the opposite end slides into the cell its neighbour vacated.
    /// Direction markers are recomputed from the new geometry.
    pub fn shifted(&self, mv: &Move) -> Result<Self> {
        if mv.wriggler != self.tail.id {
            return Err(Error::InvalidPieceReference { id: mv.wriggler });
        }

        let old: Vec<Position> = self.chain().collect();
        let mut chain = Vec::with_capacity(old.len());
        match mv.end {
            End::Head => {
                chain.push(mv.dest);
                chain.extend_from_slice(&old[..old.len() - 1]);
            }
            End::Tail => {
                chain.extend_from_slice(&old[1..]);
                chain.push(mv.dest);
            }
        }

        Self::from_chain(&chain, self.tail.id)
    }

    /// Resets every cell this wriggler covers to open.
    pub fn clear_from(&self, grid: &mut Grid) -> Result<()> {
        self.chain().try_for_each(|pos| grid.clear(pos))
    }

    /// Draws this wriggler's markers onto open cells of `grid`.
    pub fn place_on(&self, grid: &mut Grid) -> Result<()> {
        self.markers()
            .try_for_each(|(pos, cell)| grid.occupy(pos, cell))
    }
}

impl fmt::Display for Wriggler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "wriggler {} ({} cells)", self.tail.id, self.cell_count())?;
        writeln!(
            f,
            "  head {} at {}",
            Cell::Head(self.head.next),
            self.head.pos
        )?;
        for (i, segment) in self.body.iter().enumerate() {
            writeln!(
                f,
                "  segment {} {} at {}",
                i + 1,
                Cell::Body(segment.next),
                segment.pos
            )?;
        }
        write!(f, "  tail {} at {}", self.tail.id, self.tail.pos)
    }
}

/// Moves `wriggler` on `grid`, returning the shifted wriggler and a new board.
///
/// The input board is left untouched. The destination is assumed to be an
/// open in-bounds cell; a violated assumption surfaces as an error rather
/// than a corrupted board.
pub fn move_wriggler(wriggler: &Wriggler, mv: &Move, grid: &Grid) -> Result<(Wriggler, Grid)> {
    let moved = wriggler.shifted(mv)?;
    let mut next = grid.clone();
    wriggler.clear_from(&mut next)?;
    moved.place_on(&mut next)?;
    Ok((moved, next))
}

/// Traces every wriggler on the board.
///
/// Heads are discovered column by column, top to bottom within a column. A walk from a head follows the
/// direction markers through body cells until it reaches a tail id; any other
/// marker, leaving the board, or a walk longer than the board fails the whole
/// extraction.
pub fn find_wrigglers(grid: &Grid) -> Result<Vec<Wriggler>> {
    let mut wrigglers: Vec<Wriggler> = Vec::new();

    for (pos, cell) in grid.positions_by_column() {
        let Cell::Head(direction) = cell else {
            continue;
        };
        let wriggler = extract_wriggler(grid, pos, direction)?;
        if wrigglers.iter().any(|w| w.id() == wriggler.id()) {
            return Err(Error::extraction(
                wriggler.tail_pos(),
                format!("wriggler id {} appears more than once", wriggler.id()),
            ));
        }
        wrigglers.push(wriggler);
    }

    Ok(wrigglers)
}

/// Walks a single wriggler starting at its head.
fn extract_wriggler(grid: &Grid, head_pos: Position, direction: Direction) -> Result<Wriggler> {
    let max_links = grid.cols() * grid.rows();
    let head = Segment {
        pos: head_pos,
        next: direction,
    };
    let mut body = Vec::new();
    let mut current = head_pos.step(direction);

    while body.len() < max_links {
        match grid.tile(current) {
            Ok(Cell::Body(next)) => {
                body.push(Segment { pos: current, next });
                current = current.step(next);
            }
            Ok(Cell::Tail(id)) => {
                return Ok(Wriggler {
                    head,
                    body,
                    tail: Tail { pos: current, id },
                });
            }
            Ok(other) => {
                return Err(Error::extraction(
                    current,
                    format!("expected a body segment or tail, found `{other}`"),
                ));
            }
            Err(_) => {
                return Err(Error::extraction(
                    current,
                    format!("the wriggler starting at {head_pos} runs off the board"),
                ));
            }
        }
    }

    Err(Error::extraction(
        head_pos,
        "the wriggler never reaches a tail",
    ))
}
