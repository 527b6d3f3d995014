//! Attack maps for all piece kinds.
//!
//! An attack map is the set of squares a piece (or a whole side) could
//! capture on, computed fresh from a board. Check detection is a single
//! attack-map lookup and never asks whether an enemy move would itself be
//! legal, so there is no recursion between legality and check.

use crate::{Bitboard, Board};
use chess_core::{Color, PieceKind, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_leaper_attacks(&KNIGHT_OFFSETS);

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_leaper_attacks(&KING_OFFSETS);

/// Precomputed pawn capture tables [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    compute_leaper_attacks(&[(-1, 1), (1, 1)]),
    compute_leaper_attacks(&[(-1, -1), (1, -1)]),
];

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the diagonal capture squares of a pawn of the given color.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Returns bishop attacks from `sq`, stopping at (and including) the first
/// occupied square in each direction.
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &DIAGONAL)
}

/// Returns rook attacks from `sq` with the same blocking rule as bishops.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &ORTHOGONAL)
}

/// Returns queen attacks: the union of rook and bishop attacks.
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares a piece of the given kind and color on `sq` attacks.
///
/// Pawns attack only their two forward diagonals; a pawn advance never
/// captures.
pub fn piece_attacks(kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

/// Every square attacked by at least one piece of `color`.
pub fn attack_map(board: &Board, color: Color) -> Bitboard {
    let occupied = board.occupied();
    board
        .pieces(color)
        .fold(Bitboard::EMPTY, |map, (sq, occupant)| {
            map | piece_attacks(occupant.kind, color, sq, occupied)
        })
}

/// Squares of the pieces of color `by` that attack `target`.
pub fn attackers_of(board: &Board, target: Square, by: Color) -> Bitboard {
    let occupied = board.occupied();
    board
        .pieces(by)
        .filter(|(sq, occupant)| piece_attacks(occupant.kind, by, *sq, occupied).contains(target))
        .map(|(sq, _)| sq)
        .collect()
}

/// Returns true if `sq` is attacked by any piece of color `by`.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    attack_map(board, by).contains(sq)
}

/// Returns true if the king of the given color is attacked.
///
/// A board without that king is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

fn ray_attacks(sq: Square, occupied: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(file_step, rank_step) in directions {
        let mut current = sq;
        while let Some(next) = current.offset(file_step, rank_step) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

/// Computes single-step attacks for all squares at compile time.
const fn compute_leaper_attacks(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut index = 0u8;

    while index < 64 {
        let mut bb = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (file_delta, rank_delta) = offsets[i];
            let file = index as i8 % 8 + file_delta;
            let rank = index as i8 / 8 + rank_delta;
            if let Some(sq) = Square::A1.offset(file, rank) {
                bb |= 1u64 << sq.index();
            }
            i += 1;
        }
        attacks[index as usize] = Bitboard(bb);
        index += 1;
    }

    attacks
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

    #[test]
    fn knight_attacks_center_edge_corner() {
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert_eq!(knight_attacks(sq("a4")).count(), 4);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert!(knight_attacks(sq("e4")).contains(sq("f6")));
        assert!(knight_attacks(sq("e4")).contains(sq("c3")));
    }

    #[test]
    fn king_attacks_center_edge_corner() {
        assert_eq!(king_attacks(sq("d4")).count(), 8);
        assert_eq!(king_attacks(sq("a4")).count(), 5);
        assert_eq!(king_attacks(Square::A1).count(), 3);
    }

    #[test]
    fn pawn_attacks_by_color() {
        let white = pawn_attacks(sq("d4"), Color::White);
        assert_eq!(white.count(), 2);
        assert!(white.contains(sq("c5")) && white.contains(sq("e5")));

        let black = pawn_attacks(sq("d4"), Color::Black);
        assert!(black.contains(sq("c3")) && black.contains(sq("e3")));

        assert_eq!(pawn_attacks(sq("a4"), Color::White).count(), 1);
        assert_eq!(pawn_attacks(sq("d8"), Color::White).count(), 0);
    }

    #[test]
    fn sliders_stop_at_first_blocker() {
        let occupied: Bitboard = [sq("d6"), sq("f4")].into_iter().collect();
        let rook = rook_attacks(sq("d4"), occupied);
        assert!(rook.contains(sq("d6")));
        assert!(!rook.contains(sq("d7")));
        assert!(rook.contains(sq("f4")));
        assert!(!rook.contains(sq("g4")));
        assert_eq!(rook_attacks(sq("d4"), Bitboard::EMPTY).count(), 14);
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
    }

    #[test]
    fn start_position_is_quiet() {
        let board = Board::default();
        assert!(!is_in_check(&board, Color::White));
        assert!(!is_in_check(&board, Color::Black));
        // Every square of rank 3 is covered by white.
        let white = attack_map(&board, Color::White);
        assert!(Square::all()
            .filter(|s| s.rank() == chess_core::Rank::R3)
            .all(|s| white.contains(s)));
        assert!(!white.contains(sq("e4")));
    }

    #[test]
    fn attackers_of_king() {
        // Black king on e8 attacked by a rook on e1 and a knight on d6.
        let board = board("4k3/8/3N4/8/8/8/8/4R1K1");
        let attackers = attackers_of(&board, sq("e8"), Color::White);
        assert_eq!(attackers.count(), 2);
        assert!(attackers.contains(sq("e1")) && attackers.contains(sq("d6")));
        assert!(is_in_check(&board, Color::Black));
    }

    #[test]
    fn pawn_advance_is_not_an_attack() {
        let board = board("8/8/8/4k3/4P3/8/8/4K3");
        assert!(!is_in_check(&board, Color::Black));
        let board = self::board("8/8/8/3k4/4P3/8/8/4K3");
        assert!(is_in_check(&board, Color::Black));
    }

    #[test]
    fn no_king_no_check() {
        let board = board("8/8/8/8/8/8/8/R7");
        assert!(!is_in_check(&board, Color::Black));
    }
}
