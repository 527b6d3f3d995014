//! The 8x8 board.
//!
//! Each cell holds at most one [`Occupant`], a small copyable reference to
//! a piece entity. The board knows nothing about turns, players or logs;
//! it answers occupancy questions and validates moves against piece rules.

use crate::movegen::{self, MoveError, MoveOutcome};
use crate::piece::PieceId;
use crate::Bitboard;
use chess_core::{Color, File, InvalidPosition, PieceKind, Placement, Rank, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A piece as seen from the square it stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

/// Board state: cell occupants plus the square a pawn skipped on the
/// previous move, if it advanced two ranks.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Occupant>; 64],
    en_passant: Option<Square>,
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            en_passant: None,
        }
    }

    /// Builds a board from a parsed placement. Piece ids are assigned in
    /// reading order, rank 8 to 1 and file a to h, starting from zero.
    pub fn from_placement(placement: &Placement) -> Self {
        let mut board = Board::empty();
        for (id, (sq, kind, color)) in placement.pieces().enumerate() {
            board.place(
                sq,
                Some(Occupant {
                    id: PieceId(id as u8),
                    kind,
                    color,
                    has_moved: false,
                }),
            );
        }
        board
    }

    /// Returns the occupant of a square.
    #[inline]
    pub fn occupant(&self, sq: Square) -> Option<Occupant> {
        self.squares[sq.index() as usize]
    }

    /// Looks up a square by its label.
    pub fn square_at(&self, label: &str) -> Result<Option<Occupant>, InvalidPosition> {
        Square::from_label(label).map(|sq| self.occupant(sq))
    }

    /// Overwrites a square's occupant without any validation.
    #[inline]
    pub fn place(&mut self, sq: Square, occupant: Option<Occupant>) {
        self.squares[sq.index() as usize] = occupant;
    }

    /// The square skipped by a pawn's double step on the previous move.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    /// All occupied squares.
    pub fn occupied(&self) -> Bitboard {
        self.iter().map(|(sq, _)| sq).collect()
    }

    /// Squares occupied by pieces of one color.
    pub fn pieces_of(&self, color: Color) -> Bitboard {
        self.pieces(color).map(|(sq, _)| sq).collect()
    }

    /// Iterates the pieces of one color, a1 to h8.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Occupant)> + '_ {
        self.iter().filter(move |(_, occupant)| occupant.color == color)
    }

    /// Iterates all occupied squares, a1 to h8.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Occupant)> + '_ {
        Square::all().filter_map(|sq| self.occupant(sq).map(|occupant| (sq, occupant)))
    }

    /// Square of the king of the given color.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, occupant)| occupant.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Checks whether the piece on `from` may move to `target`, returning
    /// what the move would capture. The board is not modified; applying the
    /// move is left to the caller.
    pub fn try_move(&self, from: Square, target: &str) -> Result<MoveOutcome, MoveError> {
        let to = Square::from_label(target)
            .map_err(|_| MoveError::InvalidTarget(target.to_string()))?;
        movegen::legal_move(self, from, to)
    }

    /// Piece placement in FEN notation.
    pub fn placement(&self) -> String {
        Placement::format_placement(|sq| {
            self.occupant(sq)
                .map(|occupant| (occupant.kind, occupant.color))
        })
    }

    /// Plain-data view of the grid for renderers.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut rows = [[None; 8]; 8];
        for (sq, occupant) in self.iter() {
            let (column, row) = sq.grid();
            rows[row as usize][column as usize] = Some(CellView {
                color: occupant.color,
                kind: occupant.kind,
            });
        }
        BoardSnapshot { rows }
    }
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Self {
        Board::from_placement(&Placement::default())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.placement())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files: String = File::ALL.iter().map(|file| format!(" {}", file)).collect();
        writeln!(f, " {}", files)?;
        for rank in Rank::ALL.iter().rev() {
            write!(f, "{}", rank)?;
            for file in File::ALL {
                let cell = self
                    .occupant(Square::new(file, *rank))
                    .map_or('.', |occupant| occupant.kind.to_fen_char(occupant.color));
                write!(f, " {}", cell)?;
            }
            writeln!(f, " {}", rank)?;
        }
        write!(f, " {}", files)
    }
}

/// Color and kind of the piece on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub color: Color,
    pub kind: PieceKind,
}

/// The grid as plain data. Row 0 is rank 8, column 0 is file a.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: [[Option<CellView>; 8]; 8],
}

impl BoardSnapshot {
    /// Cell at the given square.
    pub fn cell(&self, sq: Square) -> Option<CellView> {
        let (column, row) = sq.grid();
        self.rows[row as usize][column as usize]
    }
}
