//! Error type shared by every stage of the solver.

use std::path::PathBuf;

use crate::geometry::Position;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed puzzle on line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("failed to extract a wriggler at {position}: {reason}")]
    Extraction { position: Position, reason: String },
    #[error("the point {position} is out of bounds for a {cols}x{rows} grid")]
    OutOfBounds {
        position: Position,
        cols: usize,
        rows: usize,
    },
    #[error("{from} and {to} are not orthogonally adjacent")]
    InvalidGeometry { from: Position, to: Position },
    #[error("no wriggler has tail id {id}")]
    InvalidPieceReference { id: u32 },
    #[error("the cell at {position} is already occupied")]
    Overlap { position: Position },
}

impl Error {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn extraction(position: Position, reason: impl Into<String>) -> Self {
        Error::Extraction {
            position,
            reason: reason.into(),
        }
    }
}
