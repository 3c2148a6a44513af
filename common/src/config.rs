//! Configuration for a game.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Result;
use crate::board::check_dimensions;

/// Board dimensions, mine count and randomness for a new game.
///
/// # Examples
///
/// ```
/// use minesweeper_logic::GameConfig;
///
/// let config = GameConfig::new(16, 16, 40).with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    /// Random seed for reproducible boards and guesses
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(height: usize, width: usize, mines: usize) -> Self {
        Self {
            height,
            width,
            mines,
            seed: None,
        }
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the board is non-empty and leaves at least one safe cell.
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.height, self.width, self.mines)
    }

    /// The seeded rng if a seed is set, otherwise one drawn from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(8, 8, 8)
    }
}
