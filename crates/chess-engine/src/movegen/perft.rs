//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Castling and underpromotion are not part of these rules, so only
//! reference positions and depths where neither occurs match the published
//! numbers.

use super::{generate_moves, legal_move, make_move};
use crate::Board;
use chess_core::{Color, Move};

/// Counts the number of leaf nodes at the given depth, `color` to move.
pub fn perft(board: &Board, color: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(board, color);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .filter_map(|m| play(board, *m))
        .map(|next| perft(&next, color.opposite(), depth - 1))
        .sum()
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &Board, color: Color, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = generate_moves(board, color)
        .into_iter()
        .filter_map(|m| {
            let next = play(board, m)?;
            let nodes = if depth > 1 {
                perft(&next, color.opposite(), depth - 1)
            } else {
                1
            };
            Some((m.to_uci(), nodes))
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

fn play(board: &Board, m: Move) -> Option<Board> {
    let outcome = legal_move(board, m.from, m.to).ok()?;
    Some(make_move(board, m.from, m.to, &outcome))
}
