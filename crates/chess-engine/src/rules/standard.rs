//! Standard chess rules implementation.

use super::RuleSet;
use crate::movegen::{self, attackers_of, MoveError, MoveOutcome};
use crate::{Bitboard, Board};
use chess_core::{Color, Move, Square};

/// Standard chess rules without castling.
///
/// - Standard piece movement
/// - Pawn double step and en passant
/// - Promotion, always to a queen
/// - Check, checkmate, and stalemate detection
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_board(&self) -> Board {
        Board::default()
    }

    fn validate(&self, board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        movegen::legal_move(board, from, to)
    }

    fn generate_moves(&self, board: &Board, color: Color) -> Vec<Move> {
        movegen::generate_moves(board, color)
    }

    fn checkers(&self, board: &Board, color: Color) -> Bitboard {
        board
            .king_square(color)
            .map_or(Bitboard::EMPTY, |king| {
                attackers_of(board, king, color.opposite())
            })
    }

    /// A checked side escapes by moving the king, or, against a single
    /// checker, by capturing it or interposing on a sliding checker's line.
    /// Double check leaves only king moves.
    fn is_checkmate(&self, board: &Board, color: Color) -> bool {
        let Some(king) = board.king_square(color) else {
            return false;
        };
        let checkers = self.checkers(board, color);
        if checkers.is_empty() || !movegen::legal_targets(board, king).is_empty() {
            return false;
        }
        if checkers.count() > 1 {
            return true;
        }
        let Some(checker) = checkers.into_iter().next() else {
            return false;
        };

        let interpose = match board.occupant(checker) {
            Some(occupant) if occupant.kind.is_slider() => checker.between(king),
            _ => Vec::new(),
        };
        let escapes = board
            .pieces(color)
            .filter(|(sq, _)| *sq != king)
            .flat_map(|(sq, _)| movegen::legal_moves_from(board, sq));

        for (to, outcome) in escapes {
            let captures_checker = outcome.captured.is_some_and(|c| c.square == checker);
            if captures_checker || interpose.contains(&to) {
                return false;
            }
        }
        true
    }

    fn is_stalemate(&self, board: &Board, color: Color) -> bool {
        !self.is_check(board, color) && !movegen::has_legal_move(board, color)
    }
}
