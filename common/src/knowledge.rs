//! The agent's knowledge base and the inference loop that runs over it.
//!
//! Facts come in two kinds: global ones (cells known to be mines or safe, cells
//! already played) and [`Sentence`]s constraining undetermined cells. Inference
//! repeats two rules until nothing changes:
//! 1. a sentence whose count is zero, or equal to its size, resolves all its cells;
//! 2. for sentences `A` and `B` with `B ⊆ A`, the cells `A - B` hold exactly
//!    `A.count - B.count` mines.
//!
//! The loop is sound but deliberately incomplete: overlapping sentences that are
//! not subsets of one another are never combined.

use std::collections::BTreeSet;

use log::{debug, trace, warn};

use crate::{Cell, Sentence};

/// What a single inference run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inference {
    /// Full passes over the knowledge, including the final one that changed nothing.
    pub passes: usize,
    /// Cells newly marked as mines.
    pub mines: usize,
    /// Cells newly marked as safe.
    pub safes: usize,
    /// Sentences added by subset elimination.
    pub derived: usize,
}

/// Everything the agent knows: cells played, cells proven safe or mined, and
/// the sentences still constraining undetermined cells.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct KnowledgeBase {
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    knowledge: Vec<Sentence>,
    refused_marks: usize,
    /// Pairs of sentences already found to contradict each other.
    contradictions: Vec<(Sentence, Sentence)>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.knowledge
    }

    /// Refused conflicting marks plus distinct contradicting sentence pairs seen so far.
    /// Always zero when every piece of evidence came from a real board.
    pub fn inconsistencies(&self) -> usize {
        self.refused_marks + self.contradictions.len()
    }

    /// Records a move. Returns `false` if the cell had already been played.
    pub(crate) fn record_move(&mut self, cell: Cell) -> bool {
        self.moves_made.insert(cell)
    }

    /// Adds a sentence, first striking out any cells that are already resolved.
    /// Sentences left without cells carry nothing and are dropped.
    pub fn add_sentence(&mut self, mut sentence: Sentence) {
        for &cell in &self.mines {
            sentence.mark_mine(cell);
        }
        for &cell in &self.safes {
            sentence.mark_safe(cell);
        }
        if !sentence.is_empty() {
            self.knowledge.push(sentence);
        }
    }

    /// Marks a cell as a mine everywhere. Returns `true` if it was not known before.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if self.safes.contains(&cell) {
            warn!("refusing to mark {cell} as a mine: it is already known to be safe");
            self.refused_marks += 1;
            return false;
        }

        let new = self.mines.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell);
        }
        new
    }

    /// Marks a cell as safe everywhere. Returns `true` if it was not known before.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        if self.mines.contains(&cell) {
            warn!("refusing to mark {cell} as safe: it is already known to be a mine");
            self.refused_marks += 1;
            return false;
        }

        let new = self.safes.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell);
        }
        new
    }

    /// Runs inference until a full pass derives nothing new.
    pub fn infer(&mut self) -> Inference {
        let mut report = Inference::default();

        loop {
            report.passes += 1;
            let mut updated = false;

            // Collect everything directly readable off the sentences before
            // marking, so that one pass sees a consistent snapshot.
            let mut new_mines = BTreeSet::new();
            let mut new_safes = BTreeSet::new();
            for sentence in &self.knowledge {
                new_mines.extend(sentence.known_mines());
                new_safes.extend(sentence.known_safes());
            }

            for cell in new_mines {
                if !self.mines.contains(&cell) && self.mark_mine(cell) {
                    report.mines += 1;
                    updated = true;
                }
            }

            if !new_safes.is_empty() {
                updated = true;
            }
            for cell in new_safes {
                if self.mark_safe(cell) {
                    report.safes += 1;
                }
            }

            self.knowledge.retain(|sentence| !sentence.is_empty());

            let derived = self.subset_inference();
            if !derived.is_empty() {
                report.derived += derived.len();
                self.knowledge.extend(derived);
                updated = true;
            }

            if !updated {
                break;
            }
        }

        trace!(
            "inference converged after {} passes: {} mines, {} safes, {} derived, {} sentences held",
            report.passes,
            report.mines,
            report.safes,
            report.derived,
            self.knowledge.len()
        );
        report
    }

    /// Compares every ordered pair of sentences and returns the new ones
    /// implied by one being contained in the other.
    fn subset_inference(&mut self) -> Vec<Sentence> {
        let mut derived: Vec<Sentence> = Vec::new();

        for outer in &self.knowledge {
            for inner in &self.knowledge {
                if inner == outer || inner.is_empty() || !inner.is_subset(outer) {
                    continue;
                }

                let candidate = outer.difference(inner);

                // Same cells with different counts, or more mines in the part than the whole.
                if candidate.is_empty() || candidate.count() < 0 {
                    let seen = self.contradictions.iter().any(|(a, b)| {
                        (a == outer && b == inner) || (a == inner && b == outer)
                    });
                    if !seen {
                        debug!("discarding {candidate} derived from {outer} and {inner}");
                        self.contradictions.push((outer.clone(), inner.clone()));
                    }
                    continue;
                }

                if !self.knowledge.contains(&candidate) && !derived.contains(&candidate) {
                    derived.push(candidate);
                }
            }
        }

        derived
    }
}
