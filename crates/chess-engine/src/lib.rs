//! Chess rules engine.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets used for attack maps
//! - [`Board`] - the 8x8 grid of piece references plus the en passant window
//! - [`Piece`] - piece entities with identity and move history
//! - [`Game`] - turn order, move log, captured piles and game lifecycle
//! - [`RuleSet`] - move legality, check, checkmate and stalemate detection
//! - [`Player`] - a seat that may only move its own color
//!
//! # Architecture
//!
//! Legality is a pure function of a board: a move must satisfy its piece's
//! movement rule, and applying it to a copy of the board must not leave the
//! mover's king in the enemy attack map. Check detection only looks at
//! attack maps, so it never recurses into legality. The [`Game`] commits a
//! move only after it has been fully validated.
//!
//! # Example
//!
//! ```
//! use chess_core::Color;
//! use chess_engine::{Game, GameResult};
//!
//! let mut game = Game::new();
//! game.add_player(Color::White, "alice").unwrap();
//! game.add_player(Color::Black, "bob").unwrap();
//! game.start().unwrap();
//!
//! game.move_from("f2", "f3").unwrap();
//! game.move_from("e7", "e5").unwrap();
//! game.move_from("g2", "g4").unwrap();
//! let record = game.move_from("d8", "h4").unwrap();
//!
//! assert!(record.checkmate);
//! assert_eq!(game.result(), Some(GameResult::BlackWins));
//! ```

mod bitboard;
pub mod board;
mod game;
pub mod movegen;
mod piece;
mod player;
pub mod rules;

pub use bitboard::Bitboard;
pub use board::{Board, BoardSnapshot, CellView, Occupant};
pub use game::{Game, GameError, GameSnapshot, GameState, MoveRecord};
pub use movegen::{
    attack_map, generate_moves, is_in_check, legal_move, legal_targets, make_move, MoveError,
    MoveOutcome,
};
pub use piece::{HistoryEntry, Piece, PieceId, PieceInfo};
pub use player::Player;
pub use rules::{CheckStatus, DrawReason, GameResult, RuleSet, StandardChess};
