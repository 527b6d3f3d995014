//! Move legality.
//!
//! Every piece kind has its own movement rule, all sharing the sliding
//! path walk and the own-piece check. A move is legal when its rule
//! accepts it on the board and the mover's king is not attacked once the
//! move has been applied to a copy of the board.

mod attacks;
pub mod perft;

use crate::board::Occupant;
use crate::{Bitboard, Board};
use chess_core::{Color, Move, PieceKind, Square};
use thiserror::Error;

pub use attacks::{
    attack_map, attackers_of, bishop_attacks, is_in_check, is_square_attacked, king_attacks,
    knight_attacks, pawn_attacks, piece_attacks, queen_attacks, rook_attacks,
};

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("'{0}' doesn't look like a valid position")]
    InvalidTarget(String),

    #[error("there is no piece at {0}")]
    EmptySquare(Square),

    #[error("the piece is already at {0}")]
    NoMovement(Square),

    #[error("a {kind} can't move from {from} to {to}")]
    Geometry {
        kind: PieceKind,
        from: Square,
        to: Square,
    },

    #[error("{0} is already occupied by you")]
    OccupiedByOwnColor(Square),

    #[error("there is a piece at {0}")]
    Blocked(Square),

    #[error("nothing to capture at {0}")]
    NothingToCapture(Square),

    #[error("you can't put your king in check")]
    ExposesKing,
}

/// A piece removed from the board by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// Where the captured piece stood. Differs from the destination for
    /// en passant.
    pub square: Square,
    pub occupant: Occupant,
}

/// What a validated move does besides relocating the mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    pub captured: Option<Capture>,
    /// Kind the mover turns into on arrival.
    pub promotion: Option<PieceKind>,
    /// Pawn advanced two ranks, opening an en passant window.
    pub double_step: bool,
}

impl MoveOutcome {
    fn capturing(board: &Board, square: Square) -> Self {
        MoveOutcome {
            captured: board
                .occupant(square)
                .map(|occupant| Capture { square, occupant }),
            ..Default::default()
        }
    }
}

/// Checks a move against the mover's movement rule and board occupancy,
/// without regard to king safety.
pub fn pseudo_legal(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    let mover = board.occupant(from).ok_or(MoveError::EmptySquare(from))?;
    if from == to {
        return Err(MoveError::NoMovement(from));
    }
    if board.occupant(to).is_some_and(|target| target.color == mover.color) {
        return Err(MoveError::OccupiedByOwnColor(to));
    }

    match mover.kind {
        PieceKind::Pawn => pawn_move(board, mover, from, to),
        PieceKind::Knight => knight_move(board, from, to),
        PieceKind::Bishop => bishop_move(board, from, to),
        PieceKind::Rook => rook_move(board, from, to),
        PieceKind::Queen => queen_move(board, from, to),
        PieceKind::King => king_move(board, from, to),
    }
}

/// Full legality check: movement rule plus king safety.
pub fn legal_move(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    let outcome = pseudo_legal(board, from, to)?;
    if exposes_king(board, from, to, &outcome) {
        return Err(MoveError::ExposesKing);
    }
    Ok(outcome)
}

/// Returns true if making an already validated move would leave the
/// mover's own king attacked.
///
/// The move is applied to a copy; `board` itself is never touched.
pub fn exposes_king(board: &Board, from: Square, to: Square, outcome: &MoveOutcome) -> bool {
    let Some(mover) = board.occupant(from) else {
        return false;
    };
    let after = make_move(board, from, to, outcome);
    is_in_check(&after, mover.color)
}

/// Applies a validated move and returns the resulting board.
pub fn make_move(board: &Board, from: Square, to: Square, outcome: &MoveOutcome) -> Board {
    let mut next = board.clone();
    if let Some(capture) = outcome.captured {
        next.place(capture.square, None);
    }
    if let Some(mut mover) = board.occupant(from) {
        mover.has_moved = true;
        if let Some(kind) = outcome.promotion {
            mover.kind = kind;
        }
        next.place(from, None);
        next.place(to, Some(mover));
        next.set_en_passant(if outcome.double_step {
            from.offset(0, mover.color.pawn_direction())
        } else {
            None
        });
    }
    next
}

/// Squares the piece on `from` could plausibly reach, before rule checks.
///
/// Always a superset of the legal destinations.
fn candidate_targets(board: &Board, from: Square, mover: Occupant) -> Bitboard {
    let own = board.pieces_of(mover.color);
    let mut candidates = piece_attacks(mover.kind, mover.color, from, board.occupied());
    if mover.kind == PieceKind::Pawn {
        let dir = mover.color.pawn_direction();
        candidates |= [from.offset(0, dir), from.offset(0, 2 * dir)]
            .into_iter()
            .flatten()
            .collect::<Bitboard>();
    }
    candidates & !own
}

/// All legal moves of the piece on `from`, with their outcomes.
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<(Square, MoveOutcome)> {
    let Some(mover) = board.occupant(from) else {
        return Vec::new();
    };
    candidate_targets(board, from, mover)
        .into_iter()
        .filter_map(|to| legal_move(board, from, to).ok().map(|outcome| (to, outcome)))
        .collect()
}

/// Destination squares the piece on `from` can legally move to.
pub fn legal_targets(board: &Board, from: Square) -> Bitboard {
    legal_moves_from(board, from)
        .into_iter()
        .map(|(to, _)| to)
        .collect()
}

/// Generates all legal moves for `color`.
pub fn generate_moves(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces(color)
        .flat_map(|(from, _)| {
            legal_targets(board, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

/// Returns true if `color` has at least one legal move.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces(color)
        .any(|(from, _)| !legal_targets(board, from).is_empty())
}

fn pawn_move(
    board: &Board,
    pawn: Occupant,
    from: Square,
    to: Square,
) -> Result<MoveOutcome, MoveError> {
    let (file_delta, rank_delta) = from.delta(to);
    let forward = rank_delta * pawn.color.pawn_direction();

    let mut outcome = match (file_delta.abs(), forward) {
        (1, 1) => {
            let outcome = en_passant(board, pawn, from, to)
                .unwrap_or_else(|| MoveOutcome::capturing(board, to));
            if outcome.captured.is_none() {
                return Err(MoveError::NothingToCapture(to));
            }
            outcome
        }
        (0, 1) => {
            if board.occupant(to).is_some() {
                return Err(MoveError::Blocked(to));
            }
            MoveOutcome::default()
        }
        (0, 2) if !pawn.has_moved && from.rank() == pawn.color.pawn_rank() => {
            if slide(board, from, to)?.captured.is_some() {
                return Err(MoveError::Blocked(to));
            }
            MoveOutcome {
                double_step: true,
                ..Default::default()
            }
        }
        _ => return Err(geometry(pawn.kind, from, to)),
    };

    if to.rank() == pawn.color.promotion_rank() {
        outcome.promotion = Some(PieceKind::Queen);
    }
    Ok(outcome)
}

/// En passant: `to` is the square an enemy pawn skipped on the previous
/// move, and that pawn now stands beside the capturer.
fn en_passant(board: &Board, pawn: Occupant, from: Square, to: Square) -> Option<MoveOutcome> {
    if board.en_passant() != Some(to) {
        return None;
    }
    let square = Square::new(to.file(), from.rank());
    let occupant = board.occupant(square)?;
    if occupant.kind != PieceKind::Pawn || occupant.color == pawn.color {
        return None;
    }
    Some(MoveOutcome {
        captured: Some(Capture { square, occupant }),
        ..Default::default()
    })
}

fn knight_move(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    match from.delta(to) {
        (df, dr) if (df.abs(), dr.abs()) == (1, 2) || (df.abs(), dr.abs()) == (2, 1) => {
            Ok(MoveOutcome::capturing(board, to))
        }
        _ => Err(geometry(PieceKind::Knight, from, to)),
    }
}

fn bishop_move(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    let (df, dr) = from.delta(to);
    if df.abs() == dr.abs() && df != 0 {
        slide(board, from, to)
    } else {
        Err(geometry(PieceKind::Bishop, from, to))
    }
}

fn rook_move(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    let (df, dr) = from.delta(to);
    if (df == 0) != (dr == 0) {
        slide(board, from, to)
    } else {
        Err(geometry(PieceKind::Rook, from, to))
    }
}

fn queen_move(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    let (df, dr) = from.delta(to);
    if df == 0 || dr == 0 || df.abs() == dr.abs() {
        slide(board, from, to)
    } else {
        Err(geometry(PieceKind::Queen, from, to))
    }
}

fn king_move(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    let (df, dr) = from.delta(to);
    if df.abs().max(dr.abs()) == 1 {
        Ok(MoveOutcome::capturing(board, to))
    } else {
        Err(geometry(PieceKind::King, from, to))
    }
}

/// Walks the squares strictly between `from` and `to`; any occupant there
/// blocks the move regardless of color. The destination may hold an enemy,
/// which is captured.
fn slide(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
    if let Some(blocker) = from
        .between(to)
        .into_iter()
        .find(|sq| board.occupant(*sq).is_some())
    {
        return Err(MoveError::Blocked(blocker));
    }
    Ok(MoveOutcome::capturing(board, to))
}

fn geometry(kind: PieceKind, from: Square, to: Square) -> MoveError {
    MoveError::Geometry { kind, from, to }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Placement;

    fn sq(label: &str) -> Square {
        Square::from_label(label).unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_placement(&Placement::parse(fen).unwrap())
    }

    fn play(board: &Board, from: &str, to: &str) -> Board {
        let outcome = legal_move(board, sq(from), sq(to)).unwrap();
        make_move(board, sq(from), sq(to), &outcome)
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let board = Board::default();
        assert_eq!(generate_moves(&board, Color::White).len(), 20);
        assert_eq!(generate_moves(&board, Color::Black).len(), 20);
    }

    #[test]
    fn pawn_steps() {
        let board = Board::default();
        assert!(legal_move(&board, sq("a2"), sq("a3")).is_ok());
        let double = legal_move(&board, sq("a2"), sq("a4")).unwrap();
        assert!(double.double_step);
        assert!(matches!(
            legal_move(&board, sq("a2"), sq("a5")),
            Err(MoveError::Geometry { .. })
        ));
        assert_eq!(
            legal_move(&board, sq("a2"), sq("b3")),
            Err(MoveError::NothingToCapture(sq("b3")))
        );
        assert_eq!(
            legal_move(&board, sq("a2"), sq("a2")),
            Err(MoveError::NoMovement(sq("a2")))
        );
    }

    #[test]
    fn pawn_cannot_step_back_or_sideways() {
        let board = play(&Board::default(), "a2", "a4");
        assert!(matches!(
            legal_move(&board, sq("a4"), sq("a3")),
            Err(MoveError::Geometry { .. })
        ));
        assert!(matches!(
            legal_move(&board, sq("a4"), sq("b4")),
            Err(MoveError::Geometry { .. })
        ));
    }

    #[test]
    fn moved_pawn_cannot_double_step() {
        let board = play(&Board::default(), "e2", "e3");
        assert!(matches!(
            legal_move(&board, sq("e3"), sq("e5")),
            Err(MoveError::Geometry { .. })
        ));
    }

    #[test]
    fn pawn_advance_is_blocked() {
        let board = board("4k3/8/8/8/8/4n3/4P3/4K3");
        assert_eq!(
            legal_move(&board, sq("e2"), sq("e3")),
            Err(MoveError::Blocked(sq("e3")))
        );
        assert_eq!(
            legal_move(&board, sq("e2"), sq("e4")),
            Err(MoveError::Blocked(sq("e3")))
        );
        let board = self::board("4k3/8/8/8/4n3/8/4P3/4K3");
        assert_eq!(
            legal_move(&board, sq("e2"), sq("e4")),
            Err(MoveError::Blocked(sq("e4")))
        );
    }

    #[test]
    fn pawn_captures_diagonally() {
        let board = board("4k3/8/8/3p4/4P3/8/8/4K3");
        let outcome = legal_move(&board, sq("e4"), sq("d5")).unwrap();
        assert_eq!(outcome.captured.map(|c| c.square), Some(sq("d5")));
    }

    #[test]
    fn en_passant_window_lasts_one_move() {
        let board = board("4k3/1p6/8/P7/8/8/8/4K3 b");
        let board = play(&board, "b7", "b5");
        assert_eq!(board.en_passant(), Some(sq("b6")));

        let outcome = legal_move(&board, sq("a5"), sq("b6")).unwrap();
        let capture = outcome.captured.unwrap();
        assert_eq!(capture.square, sq("b5"));
        assert_eq!(capture.occupant.kind, PieceKind::Pawn);

        let after = make_move(&board, sq("a5"), sq("b6"), &outcome);
        assert!(after.occupant(sq("b5")).is_none());
        assert_eq!(after.occupant(sq("b6")).map(|o| o.color), Some(Color::White));

        // Any other move closes the window.
        let later = play(&play(&board, "e1", "d1"), "e8", "d8");
        assert_eq!(later.en_passant(), None);
        assert_eq!(
            legal_move(&later, sq("a5"), sq("b6")),
            Err(MoveError::NothingToCapture(sq("b6")))
        );
    }

    #[test]
    fn single_step_opens_no_window() {
        let board = board("4k3/1p6/8/P7/8/8/8/4K3 b");
        let board = play(&play(&board, "b7", "b6"), "e1", "e2");
        let board = play(&board, "b6", "b5");
        assert_eq!(board.en_passant(), None);
        assert!(legal_move(&board, sq("a5"), sq("b6")).is_err());
    }

    #[test]
    fn promotion_to_queen() {
        let board = board("1n2k3/P7/8/8/8/8/8/4K3");
        let outcome = legal_move(&board, sq("a7"), sq("a8")).unwrap();
        assert_eq!(outcome.promotion, Some(PieceKind::Queen));
        let capture = legal_move(&board, sq("a7"), sq("b8")).unwrap();
        assert_eq!(capture.promotion, Some(PieceKind::Queen));
        assert!(capture.captured.is_some());

        let after = make_move(&board, sq("a7"), sq("a8"), &outcome);
        assert_eq!(
            after.occupant(sq("a8")).map(|o| o.kind),
            Some(PieceKind::Queen)
        );
    }

    #[test]
    fn knight_jumps() {
        let board = Board::default();
        assert!(legal_move(&board, sq("b1"), sq("c3")).is_ok());
        assert!(matches!(
            legal_move(&board, sq("b1"), sq("b3")),
            Err(MoveError::Geometry { .. })
        ));
        assert_eq!(
            legal_move(&board, sq("b1"), sq("d2")),
            Err(MoveError::OccupiedByOwnColor(sq("d2")))
        );
    }

    #[test]
    fn bishop_path_blocking() {
        let mut board = Board::default();
        assert_eq!(
            legal_move(&board, sq("c1"), sq("a3")),
            Err(MoveError::Blocked(sq("b2")))
        );
        board.place(sq("b2"), None);
        assert!(legal_move(&board, sq("c1"), sq("a3")).is_ok());
        assert!(matches!(
            legal_move(&board, sq("c1"), sq("c3")),
            Err(MoveError::Geometry { .. })
        ));
    }

    #[test]
    fn slider_cannot_capture_behind_a_piece() {
        let board = board("3rk3/3p4/8/8/8/8/8/3QK3");
        assert_eq!(
            legal_move(&board, sq("d1"), sq("d8")),
            Err(MoveError::Blocked(sq("d7")))
        );
        let outcome = legal_move(&board, sq("d1"), sq("d7")).unwrap();
        assert_eq!(outcome.captured.map(|c| c.square), Some(sq("d7")));
    }

    #[test]
    fn rook_and_queen_geometry() {
        let board = board("4k3/8/8/8/8/8/8/R2QK3");
        assert!(legal_move(&board, sq("a1"), sq("a8")).is_ok());
        assert!(matches!(
            legal_move(&board, sq("a1"), sq("b2")),
            Err(MoveError::Geometry { kind: PieceKind::Rook, .. })
        ));
        assert!(legal_move(&board, sq("d1"), sq("h5")).is_ok());
        assert!(legal_move(&board, sq("d1"), sq("d7")).is_ok());
        assert!(matches!(
            legal_move(&board, sq("d1"), sq("e3")),
            Err(MoveError::Geometry { kind: PieceKind::Queen, .. })
        ));
    }

    #[test]
    fn king_moves_one_square() {
        let board = board("4k3/8/8/8/8/8/8/4K3");
        assert_eq!(legal_targets(&board, sq("e1")).count(), 5);
        assert!(matches!(
            legal_move(&board, sq("e1"), sq("g1")),
            Err(MoveError::Geometry { kind: PieceKind::King, .. })
        ));
    }

    #[test]
    fn cannot_move_into_check() {
        let board = board("4k3/8/8/8/8/8/3r4/4K3");
        assert_eq!(
            legal_move(&board, sq("e1"), sq("e2")),
            Err(MoveError::ExposesKing)
        );
        assert!(legal_move(&board, sq("e1"), sq("d2")).is_ok());
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let board = board("4r1k1/8/8/8/8/8/4B3/4K3");
        assert_eq!(
            legal_move(&board, sq("e2"), sq("d3")),
            Err(MoveError::ExposesKing)
        );
    }

    #[test]
    fn en_passant_cannot_expose_king_along_rank() {
        // Capturing en passant would clear both pawns off the fifth rank.
        let board = board("4k3/3p4/8/K3P2r/8/8/8/8 b");
        let board = play(&board, "d7", "d5");
        assert_eq!(
            legal_move(&board, sq("e5"), sq("d6")),
            Err(MoveError::ExposesKing)
        );
    }

    #[test]
    fn probing_never_mutates_the_board() {
        let board = board("4r1k1/8/8/8/8/8/4B3/4K3");
        let before = board.clone();
        for to in Square::all() {
            let _ = legal_move(&board, sq("e2"), to);
        }
        assert_eq!(board, before);
    }
}
