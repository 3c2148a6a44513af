use std::collections::BTreeSet;
use std::fmt;

use itertools::iproduct;
use rand::Rng;
use rand::seq::index;

use crate::{Cell, Error, Result};

/// The hidden truth of a game: where the mines are, plus the mines the player has flagged.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Board {
    pub height: usize,
    pub width: usize,
    mines: BTreeSet<Cell>,
    mines_found: BTreeSet<Cell>,
}

impl Board {
    /// A board with `mine_count` mines placed uniformly at random.
    pub fn random<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mine_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        check_dimensions(height, width, mine_count)?;

        let mines = index::sample(rng, height * width, mine_count)
            .into_iter()
            .map(|i| Cell::new(i / width, i % width))
            .collect();

        Ok(Board {
            height,
            width,
            mines,
            mines_found: BTreeSet::new(),
        })
    }

    /// A board with mines at exactly the given cells.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self> {
        let mines: BTreeSet<Cell> = mines.into_iter().collect();
        check_dimensions(height, width, mines.len())?;

        if let Some(&cell) = mines.iter().find(|cell| !cell.in_bounds(height, width)) {
            return Err(Error::OutOfBounds {
                cell,
                height,
                width,
            });
        }

        Ok(Board {
            height,
            width,
            mines,
            mines_found: BTreeSet::new(),
        })
    }

    /// Every cell on the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        iproduct!(0..self.height, 0..self.width).map(Cell::from)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height, self.width)
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines among the cell's neighbours, not counting the cell itself.
    pub fn adjacent_mine_count(&self, cell: Cell) -> u8 {
        cell.neighbors(self.height, self.width)
            .filter(|neighbor| self.mines.contains(neighbor))
            .count() as u8
    }

    pub fn mines_found(&self) -> &BTreeSet<Cell> {
        &self.mines_found
    }

    /// Replaces the player's flags.
    pub fn set_mines_found(&mut self, flags: BTreeSet<Cell>) {
        self.mines_found = flags;
    }

    /// Won once every mine, and nothing else, has been flagged.
    pub fn is_won(&self) -> bool {
        self.mines_found == self.mines
    }
}

pub(crate) fn check_dimensions(height: usize, width: usize, mines: usize) -> Result<()> {
    if height == 0 || width == 0 {
        return Err(Error::EmptyBoard { height, width });
    }
    if height.checked_mul(width).is_none_or(|cells| mines >= cells) {
        return Err(Error::TooManyMines {
            height,
            width,
            mines,
        });
    }
    Ok(())
}

/// Prints the mine map, `X` marking a mine.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}-", "--".repeat(self.width));
        for row in 0..self.height {
            writeln!(f, "{rule}")?;
            for col in 0..self.width {
                let mark = if self.is_mine(Cell::new(row, col)) { 'X' } else { ' ' };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "{rule}")
    }
}
