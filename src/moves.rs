//! A single wriggler move and its solution-file rendering.

use std::fmt;

use crate::geometry::Position;

/// Which end of a wriggler is being moved.
///
/// The discriminants are the codes written to solution files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    Head = 0,
    Tail = 1,
}

/// Slide one end of wriggler `wriggler` onto `dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// The tail id of the wriggler being moved.
    pub wriggler: u32,
    pub end: End,
    pub dest: Position,
}

impl Move {
    pub const fn new(wriggler: u32, end: End, dest: Position) -> Self {
        Self {
            wriggler,
            end,
            dest,
        }
    }
}

/// `<wriggler id> <0 = head, 1 = tail> <dest col> <dest row>`
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.wriggler, self.end as u8, self.dest.col, self.dest.row
        )
    }
}
