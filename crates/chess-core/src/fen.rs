//! FEN piece placement parsing and serialization.
//!
//! Only the first two FEN fields matter here: piece placement and the
//! active color. Castling, en passant and the move clocks are accepted and
//! ignored, since none of them is tracked through FEN by the engine.

use crate::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 1 to 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),
}

/// A parsed piece placement plus side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    squares: [Option<(PieceKind, Color)>; 64],
    /// Color to move first.
    pub side_to_move: Color,
}

impl Placement {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

    /// Parses a FEN string or just its placement field.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.is_empty() || fields.len() > 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let squares = Self::parse_piece_placement(fields[0])?;

        let side_to_move = match fields.get(1).copied() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        Ok(Placement {
            squares,
            side_to_move,
        })
    }

    fn parse_piece_placement(
        placement: &str,
    ) -> Result<[Option<(PieceKind, Color)>; 64], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut squares = [None; 64];
        for (row, rank) in ranks.iter().enumerate() {
            let mut column = 0u32;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    column += skip;
                } else if let Some(piece) = PieceKind::from_fen_char(c) {
                    if let Some(sq) = Square::from_grid(column as u8, row as u8) {
                        squares[sq.index() as usize] = Some(piece);
                    }
                    column += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - row
                    )));
                }
                if column > 8 {
                    break;
                }
            }
            if column != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - row,
                    column
                )));
            }
        }

        Ok(squares)
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(PieceKind, Color)> {
        self.squares[sq.index() as usize]
    }

    /// Iterates occupied squares in reading order (rank 8 to 1, file a to h).
    pub fn pieces(&self) -> impl Iterator<Item = (Square, PieceKind, Color)> + '_ {
        Square::reading_order()
            .filter_map(|sq| self.piece_at(sq).map(|(kind, color)| (sq, kind, color)))
    }

    /// Serializes a placement field from a square lookup.
    pub fn format_placement<F>(piece_at: F) -> String
    where
        F: Fn(Square) -> Option<(PieceKind, Color)>,
    {
        let mut fen = String::new();
        for row in 0..8u8 {
            let mut empty = 0;
            for column in 0..8u8 {
                let piece = Square::from_grid(column, row).and_then(&piece_at);
                match piece {
                    Some((kind, color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(kind.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }

    /// Converts the placement back to a two-field FEN string.
    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!(
            "{} {}",
            Self::format_placement(|sq| self.piece_at(sq)),
            side
        )
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}
