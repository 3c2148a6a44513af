//! Game driver: reveals the agent's moves on the board and feeds back what it sees.

use log::debug;
use rand::Rng;

use crate::{Agent, Board, Cell, Error, GameConfig, Result};

/// Represents the current state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// How the agent picked a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The cell was proven safe.
    Safe,
    /// No cell was proven safe, so the agent guessed.
    Random,
}

/// What revealing a cell showed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// The cell was safe; the number of adjacent mines.
    Clear(u8),
    /// The cell was a mine and the game is lost.
    Mine,
    /// The cell had already been revealed; nothing changed.
    AlreadyRevealed,
}

/// One move made by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub cell: Cell,
    pub kind: MoveKind,
    pub reveal: Reveal,
}

/// A board together with the agent playing it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Game {
    pub board: Board,
    pub agent: Agent,
    pub state: GameState,
    /// The mine that ended the game, if one did.
    pub detonated: Option<Cell>,
}

impl Game {
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = config.rng();
        let board = Board::random(config.height, config.width, config.mines, &mut rng)?;
        Ok(Self::from_board(board))
    }

    pub fn from_board(board: Board) -> Self {
        let agent = Agent::new(board.height, board.width);
        let state = if board.is_won() {
            GameState::Won
        } else {
            GameState::Playing
        };
        Game {
            board,
            agent,
            state,
            detonated: None,
        }
    }

    /// Deserializes a game from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bcs::from_bytes(bytes)?)
    }

    /// Serializes the game to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    /// Lets the agent pick and play one move: a proven-safe cell if it knows
    /// one, a random guess otherwise.
    ///
    /// Returns `None` when the agent has no cell left to play.
    pub fn play_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<Turn>> {
        if self.state != GameState::Playing {
            return Err(Error::GameOver);
        }

        let (cell, kind) = match self.agent.make_safe_move() {
            Some(cell) => (cell, MoveKind::Safe),
            None => match self.agent.make_random_move(rng) {
                Some(cell) => (cell, MoveKind::Random),
                None => {
                    debug!("no moves left to make");
                    return Ok(None);
                }
            },
        };
        debug!("agent plays {cell} ({kind:?})");

        let reveal = self.reveal(cell)?;
        Ok(Some(Turn { cell, kind, reveal }))
    }

    /// Reveals a cell on the board and hands the result to the agent.
    ///
    /// Hitting a mine loses the game. Otherwise the agent learns the adjacent
    /// mine count, its deduced mines become the board's flags, and the game is
    /// won once those flags match the mines.
    pub fn reveal(&mut self, cell: Cell) -> Result<Reveal> {
        if self.state != GameState::Playing {
            return Err(Error::GameOver);
        }
        if !self.board.contains(cell) {
            return Err(Error::OutOfBounds {
                cell,
                height: self.board.height,
                width: self.board.width,
            });
        }
        if self.agent.moves_made().contains(&cell) {
            return Ok(Reveal::AlreadyRevealed);
        }

        if self.board.is_mine(cell) {
            debug!("{cell} was a mine");
            self.state = GameState::Lost;
            self.detonated = Some(cell);
            return Ok(Reveal::Mine);
        }

        let count = self.board.adjacent_mine_count(cell);
        let inference = self.agent.add_knowledge(cell, count);
        debug!(
            "{cell} shows {count}; {} new mines, {} new safes, {} sentences derived",
            inference.mines, inference.safes, inference.derived
        );

        self.board.set_mines_found(self.agent.mines().clone());
        if self.board.is_won() {
            self.state = GameState::Won;
        }

        Ok(Reveal::Clear(count))
    }

    /// Plays turns until the game is decided or the agent runs out of moves.
    pub fn play_to_end<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GameState> {
        while self.state == GameState::Playing {
            if self.play_turn(rng)?.is_none() {
                break;
            }
        }
        Ok(self.state)
    }

    /// The player's view of the board: `■` hidden, `F` flagged, `*` the
    /// detonated mine, digits for revealed cells.
    pub fn render(&self) -> String {
        let mut out = String::from("   ");
        for col in 0..self.board.width {
            out.push_str(&format!("{col:^3}"));
        }
        out.push_str(&format!("\n  +{}\n", "---".repeat(self.board.width)));

        for row in 0..self.board.height {
            out.push_str(&format!("{row:^2}|"));
            for col in 0..self.board.width {
                let cell = Cell::new(row, col);
                let display = if self.detonated == Some(cell) {
                    " * ".to_string()
                } else if self.agent.moves_made().contains(&cell) {
                    format!(" {} ", self.board.adjacent_mine_count(cell))
                } else if self.board.mines_found().contains(&cell) {
                    " F ".to_string()
                } else {
                    " ■ ".to_string()
                };
                out.push_str(&display);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_game_initialization() {
        let game = Game::new(&GameConfig::new(5, 5, 3).with_seed(1)).unwrap();
        assert_eq!(game.board.height, 5);
        assert_eq!(game.board.width, 5);
        assert_eq!(game.board.mine_count(), 3);
        assert_eq!(game.state, GameState::Playing);
        assert!(game.agent.moves_made().is_empty());
    }

    #[test]
    fn test_game_initialization_too_many_mines() {
        let result = Game::new(&GameConfig::new(3, 3, 9));
        assert!(matches!(result, Err(Error::TooManyMines { .. })));
    }

    #[test]
    fn test_single_mine_board_is_solved() {
        // 3x3 with the mine in a corner: opening the far corner solves it with no guesses.
        let board = Board::with_mines(3, 3, [Cell::new(2, 2)]).unwrap();
        let mut game = Game::from_board(board);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(game.reveal(Cell::new(0, 0)).unwrap(), Reveal::Clear(0));
        let state = game.play_to_end(&mut rng).unwrap();

        assert_eq!(state, GameState::Won);
        assert_eq!(game.board.mines_found(), &BTreeSet::from([Cell::new(2, 2)]));
        assert!(game.detonated.is_none());
    }

    #[test]
    fn test_hitting_mine() {
        let board = Board::with_mines(2, 2, [Cell::new(0, 0)]).unwrap();
        let mut game = Game::from_board(board);

        assert_eq!(game.reveal(Cell::new(0, 0)).unwrap(), Reveal::Mine);
        assert_eq!(game.state, GameState::Lost);
        assert_eq!(game.detonated, Some(Cell::new(0, 0)));
        assert!(matches!(game.reveal(Cell::new(1, 1)), Err(Error::GameOver)));
    }

    #[test]
    fn test_reveal_out_of_bounds() {
        let board = Board::with_mines(2, 2, [Cell::new(0, 0)]).unwrap();
        let mut game = Game::from_board(board);
        assert!(matches!(
            game.reveal(Cell::new(2, 0)),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn test_reveal_twice() {
        let board = Board::with_mines(3, 3, [Cell::new(0, 0)]).unwrap();
        let mut game = Game::from_board(board);
        assert_eq!(game.reveal(Cell::new(2, 2)).unwrap(), Reveal::Clear(0));
        assert_eq!(game.reveal(Cell::new(2, 2)).unwrap(), Reveal::AlreadyRevealed);
    }

    #[test]
    fn test_safe_moves_preferred() {
        let board = Board::with_mines(4, 4, [Cell::new(3, 3)]).unwrap();
        let mut game = Game::from_board(board);
        let mut rng = StdRng::seed_from_u64(5);

        game.reveal(Cell::new(0, 0)).unwrap();
        let turn = game.play_turn(&mut rng).unwrap().unwrap();

        assert_eq!(turn.kind, MoveKind::Safe);
        assert!(matches!(turn.reveal, Reveal::Clear(_)));
    }

    #[test]
    fn test_seeded_games_terminate() {
        for seed in 0..20 {
            let config = GameConfig::new(8, 8, 10).with_seed(seed);
            let mut game = Game::new(&config).unwrap();
            let mut rng = config.rng();
            let state = game.play_to_end(&mut rng).unwrap();
            assert_ne!(state, GameState::Playing, "seed {seed}");
            assert_eq!(game.agent.knowledge().inconsistencies(), 0);
        }
    }

    fn play_seeded(config: &GameConfig) -> (Vec<Turn>, Vec<u8>) {
        let mut game = Game::new(config).unwrap();
        let mut rng = config.rng();
        let mut turns = Vec::new();
        while let Some(turn) = game.play_turn(&mut rng).unwrap() {
            turns.push(turn);
            if game.state != GameState::Playing {
                break;
            }
        }
        (turns, game.to_bytes().unwrap())
    }

    #[test]
    fn test_same_seed_replays_same_game() {
        for seed in 0..10 {
            let config = GameConfig::new(16, 16, 10).with_seed(seed);
            let (turns_a, bytes_a) = play_seeded(&config);
            let (turns_b, bytes_b) = play_seeded(&config);
            assert_eq!(turns_a, turns_b, "seed {seed}");
            assert_eq!(bytes_a, bytes_b, "seed {seed}");
        }
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = GameConfig::new(6, 6, 5).with_seed(11);
        let mut game = Game::new(&config).unwrap();
        let mut rng = config.rng();
        game.play_turn(&mut rng).unwrap();

        let restored = Game::from_bytes(&game.to_bytes().unwrap()).unwrap();

        assert_eq!(restored.board, game.board);
        assert_eq!(restored.state, game.state);
        assert_eq!(restored.agent.moves_made(), game.agent.moves_made());
        assert_eq!(restored.agent.safes(), game.agent.safes());
        assert_eq!(
            restored.agent.knowledge().sentences().len(),
            game.agent.knowledge().sentences().len()
        );
    }

    #[test]
    fn test_render() {
        // Revealing (0,0) pins the mine at (0,1); (0,2) is never touched.
        let board = Board::with_mines(1, 3, [Cell::new(0, 1)]).unwrap();
        let mut game = Game::from_board(board);
        game.reveal(Cell::new(0, 0)).unwrap();
        assert_eq!(game.state, GameState::Won);

        let rendered = game.render();
        assert!(rendered.contains(" 1 "));
        assert!(rendered.contains(" F "));
        assert!(rendered.contains(" ■ "));
    }
}
