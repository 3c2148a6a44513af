use std::fmt;

/// A coordinate on the board, `row` and `col` both 0-indexed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Whether the cell lies on a `height` x `width` board.
    pub fn in_bounds(self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// All valid neighbours of the cell on a `height` x `width` board.
    /// Edge and corner cells have 5 and 3 neighbours; the cell itself is never yielded.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        (-1..=1isize).flat_map(move |dr| {
            (-1..=1isize).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    return None;
                }

                let row = self.row.checked_add_signed(dr)?;
                let col = self.col.checked_add_signed(dc)?;

                (row < height && col < width).then_some(Cell { row, col })
            })
        })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
