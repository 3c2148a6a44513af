//! Error types for the minesweeper crate.

use thiserror::Error;

use crate::Cell;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("board must have at least one row and one column (got {height}x{width})")]
    EmptyBoard { height: usize, width: usize },

    #[error("{mines} mines do not fit on a {height}x{width} board (at least one safe cell is required)")]
    TooManyMines {
        height: usize,
        width: usize,
        mines: usize,
    },

    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("game already over")]
    GameOver,

    #[error("failed to encode or decode game state: {0}")]
    Codec(#[from] bcs::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
