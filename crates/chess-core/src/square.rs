//! Board squares and square labels.
//!
//! A square label is exactly two ASCII characters: a file in `a`-`h`
//! followed by a rank in `1`-`8`. Anything else is rejected with
//! [`InvalidPosition`]; labels are never coerced (`"E4"` is not `"e4"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A string that is not a square label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{0}' doesn't look like a valid position")]
pub struct InvalidPosition(pub String);

/// A file (column) on the chess board, from A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files in order.
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Creates a file from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a file from a lowercase character ('a'-'h').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Self::from_index(c as u8 - b'a'),
            _ => None,
        }
    }

    /// Returns the index (0-7).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the chess board, from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// All ranks in order.
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    /// Creates a rank from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a rank from a character ('1'-'8').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Self::from_index(c as u8 - b'1'),
            _ => None,
        }
    }

    /// Returns the index (0-7).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A square on the chess board, indexed 0-63.
///
/// Squares are indexed in little-endian rank-file mapping:
/// - a1 = 0, b1 = 1, ..., h1 = 7
/// - a2 = 8, ..., h8 = 63
///
/// The grid view used by renderers is different: [`Square::grid`] returns
/// `(column, row)` with row 0 being rank 8.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square(u8);

impl Square {
    /// Creates a square from file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.index() * 8 + file.index())
    }

    /// Creates a square from index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses a square label (e.g., "e4").
    pub fn from_label(label: &str) -> Result<Self, InvalidPosition> {
        let invalid = || InvalidPosition(label.to_string());
        let mut chars = label.chars();
        let file = chars.next().and_then(File::from_char).ok_or_else(invalid)?;
        let rank = chars.next().and_then(Rank::from_char).ok_or_else(invalid)?;
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(Square::new(file, rank))
    }

    /// Creates a square from grid coordinates, row 0 being rank 8.
    pub const fn from_grid(column: u8, row: u8) -> Option<Self> {
        if column < 8 && row < 8 {
            Some(Square((7 - row) * 8 + column))
        } else {
            None
        }
    }

    /// Returns the grid coordinates `(column, row)`, row 0 being rank 8.
    #[inline]
    pub const fn grid(self) -> (u8, u8) {
        (self.0 % 8, 7 - self.0 / 8)
    }

    /// Returns the index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the file of this square.
    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 % 8) as usize]
    }

    /// Returns the rank of this square.
    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 / 8) as usize]
    }

    /// Returns the square shifted by the given file and rank deltas, if it
    /// is still on the board.
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = (self.0 % 8) as i8 + file_delta;
        let rank = (self.0 / 8) as i8 + rank_delta;
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            None
        } else {
            Some(Square((rank * 8 + file) as u8))
        }
    }

    /// File and rank difference from `self` to `other`.
    #[inline]
    pub const fn delta(self, other: Square) -> (i8, i8) {
        (
            (other.0 % 8) as i8 - (self.0 % 8) as i8,
            (other.0 / 8) as i8 - (self.0 / 8) as i8,
        )
    }

    /// Returns the squares strictly between `self` and `other` when they
    /// share a rank, file, or diagonal. Empty otherwise.
    pub fn between(self, other: Square) -> Vec<Square> {
        let (df, dr) = self.delta(other);
        if (df == 0 && dr == 0) || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
            return Vec::new();
        }
        let step = (df.signum(), dr.signum());
        let mut squares = Vec::new();
        let mut current = self;
        while let Some(next) = current.offset(step.0, step.1) {
            if next == other {
                break;
            }
            squares.push(next);
            current = next;
        }
        squares
    }

    /// Iterates all 64 squares from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    /// Iterates all 64 squares in reading order: rank 8 to 1, file a to h.
    pub fn reading_order() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |column| Square((7 - row) * 8 + column)))
    }

    /// Returns the label for this square.
    pub fn to_label(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    // Common squares
    pub const A1: Square = Square(0);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const H8: Square = Square(63);
}

impl FromStr for Square {
    type Err = InvalidPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_label(s)
    }
}

impl TryFrom<String> for Square {
    type Error = InvalidPosition;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::from_label(&value)
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_label()
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_label())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
