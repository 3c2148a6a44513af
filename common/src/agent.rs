use std::collections::BTreeSet;

use itertools::iproduct;
use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::knowledge::{Inference, KnowledgeBase};
use crate::{Cell, Sentence};

/// Minesweeper player that only reveals cells it can prove safe, and guesses otherwise.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Agent {
    height: usize,
    width: usize,
    knowledge: KnowledgeBase,
}

impl Agent {
    pub fn new(height: usize, width: usize) -> Self {
        Agent {
            height,
            width,
            knowledge: KnowledgeBase::new(),
        }
    }

    /// The agent's full knowledge, including the sentences it holds.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        self.knowledge.moves_made()
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        self.knowledge.safes()
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        self.knowledge.mines()
    }

    /// See [`KnowledgeBase::mark_mine`].
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        self.knowledge.mark_mine(cell)
    }

    /// See [`KnowledgeBase::mark_safe`].
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.knowledge.mark_safe(cell)
    }

    /// Takes in what the board revealed about a safe cell: `count` of its
    /// neighbours are mines.
    ///
    /// Builds a sentence over the neighbours that are still undetermined, with the
    /// count reduced by the neighbours already known to be mines, then runs
    /// inference to a fixed point. Evidence for a cell already played is ignored.
    pub fn add_knowledge(&mut self, cell: Cell, count: u8) -> Inference {
        if !self.knowledge.record_move(cell) {
            debug!("ignoring repeated evidence for {cell}");
            return Inference::default();
        }
        self.knowledge.mark_safe(cell);

        let mut known_mines_count = 0;
        let mut unknown = BTreeSet::new();
        for neighbor in cell.neighbors(self.height, self.width) {
            if self.knowledge.mines().contains(&neighbor) {
                known_mines_count += 1;
            } else if !self.knowledge.safes().contains(&neighbor) {
                unknown.insert(neighbor);
            }
        }

        let sentence = Sentence::new(unknown, i32::from(count) - known_mines_count);
        debug!("{cell} shows {count}: adding {sentence}");
        self.knowledge.add_sentence(sentence);

        self.knowledge.infer()
    }

    /// The lowest known-safe cell that has not been played yet, if any.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.knowledge
            .safes()
            .difference(self.knowledge.moves_made())
            .next()
            .copied()
    }

    /// A uniformly random cell that has not been played and is not known to be a mine.
    pub fn make_random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        // Row-major enumeration keeps the choice reproducible under a seeded rng.
        let candidates: Vec<Cell> = iproduct!(0..self.height, 0..self.width)
            .map(Cell::from)
            .filter(|cell| {
                !self.knowledge.moves_made().contains(cell) && !self.knowledge.mines().contains(cell)
            })
            .collect();

        candidates.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn test_three_by_three_single_mine() {
        // Mine at (2,2); feed the agent the true counts of the cells it reveals.
        let mut agent = Agent::new(3, 3);

        agent.add_knowledge(c(0, 0), 0);
        assert_eq!(
            agent.safes(),
            &BTreeSet::from([c(0, 0), c(0, 1), c(1, 0), c(1, 1)])
        );
        assert!(agent.mines().is_empty());

        agent.add_knowledge(c(0, 1), 0);
        agent.add_knowledge(c(1, 0), 0);
        assert_eq!(agent.safes().len(), 8);
        assert!(!agent.safes().contains(&c(2, 2)));
        assert!(agent.mines().is_empty());

        // (1,1) sees one mine, and (2,2) is its only undetermined neighbour.
        agent.add_knowledge(c(1, 1), 1);
        assert_eq!(agent.mines(), &BTreeSet::from([c(2, 2)]));
        assert!(agent.knowledge().sentences().is_empty());
    }

    #[test]
    fn test_repeated_evidence_is_ignored() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge(c(1, 1), 2);
        let before = agent.knowledge().sentences().to_vec();

        let report = agent.add_knowledge(c(1, 1), 2);

        assert_eq!(report, Inference::default());
        assert_eq!(agent.knowledge().sentences(), before.as_slice());
    }

    #[test]
    fn test_known_mines_are_subtracted_from_count() {
        let mut agent = Agent::new(3, 3);
        agent.mark_mine(c(0, 0));

        agent.add_knowledge(c(0, 1), 2);

        // Neighbours of (0,1) minus the known mine at (0,0), one mine left.
        assert_eq!(
            agent.knowledge().sentences(),
            &[Sentence::new([c(0, 2), c(1, 0), c(1, 1), c(1, 2)], 1)]
        );
    }

    #[test]
    fn test_corner_count_resolves_all_neighbours() {
        let mut agent = Agent::new(4, 4);
        agent.add_knowledge(c(3, 3), 3);
        assert_eq!(
            agent.mines(),
            &BTreeSet::from([c(2, 2), c(2, 3), c(3, 2)])
        );
    }

    #[test]
    fn test_safe_move_none_available() {
        let mut agent = Agent::new(2, 2);
        assert_eq!(agent.make_safe_move(), None);

        // A revealed 3 in a 2x2 corner: every neighbour is a mine, nothing left to play.
        agent.add_knowledge(c(0, 0), 3);
        let moves_before = agent.moves_made().clone();
        assert_eq!(agent.make_safe_move(), None);
        assert_eq!(agent.moves_made(), &moves_before);
    }

    #[test]
    fn test_safe_move_is_unplayed() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge(c(0, 0), 0);

        let cell = agent.make_safe_move().unwrap();
        assert!(agent.safes().contains(&cell));
        assert!(!agent.moves_made().contains(&cell));
        assert_eq!(agent.moves_made().len(), 1);
    }

    #[test]
    fn test_random_move_avoids_played_and_mines() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut agent = Agent::new(2, 2);
        agent.add_knowledge(c(0, 0), 1);
        agent.mark_mine(c(1, 1));

        for _ in 0..50 {
            let cell = agent.make_random_move(&mut rng).unwrap();
            assert!(cell == c(0, 1) || cell == c(1, 0));
        }
    }

    #[test]
    fn test_random_move_none_available() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut agent = Agent::new(1, 2);
        agent.add_knowledge(c(0, 0), 1);

        assert_eq!(agent.mines(), &BTreeSet::from([c(0, 1)]));
        assert_eq!(agent.make_random_move(&mut rng), None);
        assert_eq!(agent.make_safe_move(), None);
    }
}
