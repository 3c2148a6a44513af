//! Minesweeper with a player that reasons its way through the board.
//!
//! The [`Agent`] keeps a [`KnowledgeBase`] of [`Sentence`]s, each saying how many
//! mines hide among a set of undetermined cells, and runs inference over them
//! after every reveal. It plays cells it has proven safe and guesses only when
//! it has none. [`Board`] holds the hidden mines and [`Game`] drives the two.

pub mod agent;
pub mod board;
pub mod cell;
pub mod config;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod sentence;

pub use agent::Agent;
pub use board::Board;
pub use cell::Cell;
pub use config::GameConfig;
pub use error::{Error, Result};
pub use game::{Game, GameState, MoveKind, Reveal, Turn};
pub use knowledge::{Inference, KnowledgeBase};
pub use sentence::Sentence;
