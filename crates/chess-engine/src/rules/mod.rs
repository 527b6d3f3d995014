//! Rule set abstraction.
//!
//! This module provides the [`RuleSet`] trait which gathers every question
//! the game asks about a board: is this move legal, which pieces give
//! check, is the side to move mated or stalemated. The [`Game`](crate::Game)
//! delegates all of them to the active rule set.

mod standard;

pub use standard::StandardChess;

use crate::movegen::{MoveError, MoveOutcome};
use crate::{Bitboard, Board};
use chess_core::{Color, Move, Square};
use serde::{Deserialize, Serialize};

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// A win for the given color.
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }

    /// The winning color, or `None` for a draw.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "White wins by checkmate"),
            GameResult::BlackWins => write!(f, "Black wins by checkmate"),
            GameResult::Draw(DrawReason::Stalemate) => write!(f, "Draw by stalemate"),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
}

/// Check classification of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckStatus {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
}

impl CheckStatus {
    /// The result this status ends the game with, if any. `color` is the
    /// side the status describes.
    pub const fn result(self, color: Color) -> Option<GameResult> {
        if self.checkmate {
            Some(GameResult::win_for(color.opposite()))
        } else if self.stalemate {
            Some(GameResult::Draw(DrawReason::Stalemate))
        } else {
            None
        }
    }
}

/// Trait for implementing chess rules.
///
/// # Example
///
/// ```
/// use chess_core::Color;
/// use chess_engine::rules::RuleSet;
/// use chess_engine::StandardChess;
///
/// let board = StandardChess.initial_board();
/// let moves = StandardChess.generate_moves(&board, Color::White);
/// assert_eq!(moves.len(), 20);
/// ```
pub trait RuleSet {
    /// Returns the initial board for these rules.
    fn initial_board(&self) -> Board;

    /// Validates a move, returning what it would capture or promote.
    fn validate(&self, board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError>;

    /// Returns true if the given move is legal on the board.
    fn is_legal(&self, board: &Board, m: Move) -> bool {
        self.validate(board, m.from, m.to).is_ok()
    }

    /// Generates all legal moves for `color`.
    fn generate_moves(&self, board: &Board, color: Color) -> Vec<Move>;

    /// Squares of the enemy pieces attacking the king of `color`.
    fn checkers(&self, board: &Board, color: Color) -> Bitboard;

    /// Returns true if the king of `color` is attacked.
    fn is_check(&self, board: &Board, color: Color) -> bool {
        !self.checkers(board, color).is_empty()
    }

    /// Returns true if `color` is in check with no way out.
    fn is_checkmate(&self, board: &Board, color: Color) -> bool;

    /// Returns true if `color` is not in check and has no legal move.
    fn is_stalemate(&self, board: &Board, color: Color) -> bool;

    /// Full check classification of `color`.
    fn status(&self, board: &Board, color: Color) -> CheckStatus {
        let check = self.is_check(board, color);
        CheckStatus {
            check,
            checkmate: check && self.is_checkmate(board, color),
            stalemate: !check && self.is_stalemate(board, color),
        }
    }

    /// Returns the game result if `to_move` can't continue.
    fn game_result(&self, board: &Board, to_move: Color) -> Option<GameResult> {
        self.status(board, to_move).result(to_move)
    }
}
