use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::Cell;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Cells are removed as they become known, so the sentence only ever talks
/// about cells that are still undetermined. Two sentences are equal when they
/// cover the same cells with the same count.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    /// Signed so that malformed evidence shows up as a negative count instead of wrapping.
    count: i32,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: i32) -> Self {
        Sentence {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A sentence without cells is fully resolved and carries no information.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every remaining cell is a mine when the count equals the number of cells.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count >= 0 && self.count as usize == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every remaining cell is safe when the count is zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Drops a cell known to be a mine, taking its mine out of the count.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count -= 1;
        }
    }

    /// Drops a cell known to be safe.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    pub fn is_subset(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// The sentence covering the cells of `self` that are not in `other`,
    /// with the remaining mines. Only meaningful when `other` is a subset of `self`.
    pub fn difference(&self, other: &Sentence) -> Sentence {
        Sentence {
            cells: self.cells.difference(&other.cells).copied().collect(),
            count: self.count - other.count,
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}} = {}",
            self.cells.iter().join(", "),
            self.count
        )
    }
}
