//! Move representation.

use crate::square::InvalidPosition;
use crate::Square;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move of whatever piece stands on `from` to `to`.
///
/// Promotion is implicit: a pawn reaching its last rank always becomes a
/// queen, so no promotion piece is carried.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// File and rank difference covered by the move.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        self.from.delta(self.to)
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4").
    pub fn to_uci(self) -> String {
        format!("{}{}", self.from, self.to)
    }

    /// Parses a move from coordinate notation.
    ///
    /// Accepts "e2e4" and the space separated "e2 e4". A trailing `q`
    /// promotion marker is tolerated since queening is the only option.
    pub fn from_uci(s: &str) -> Result<Self, InvalidPosition> {
        let s = s.trim();
        let (from, to) = match s.split_once(char::is_whitespace) {
            Some((from, to)) => (from, to.trim()),
            None if s.len() >= 4 && s.is_char_boundary(2) => s.split_at(2),
            None => return Err(InvalidPosition(s.to_string())),
        };
        let to = to.strip_suffix('q').unwrap_or(to);
        Ok(Move::new(Square::from_label(from)?, Square::from_label(to)?))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_uci() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(m.from.to_label(), "e2");
        assert_eq!(m.to.to_label(), "e4");
        assert_eq!(m.to_uci(), "e2e4");
        assert_eq!(m.delta(), (0, 2));
    }

    #[test]
    fn move_from_spaced_pair() {
        assert_eq!(
            Move::from_uci("g1 f3").unwrap(),
            Move::from_uci("g1f3").unwrap()
        );
    }

    #[test]
    fn promotion_suffix_is_tolerated() {
        assert_eq!(Move::from_uci("b7b8q").unwrap().to.to_label(), "b8");
    }

    #[test]
    fn move_from_uci_rejects_garbage() {
        assert!(Move::from_uci("invalid").is_err());
        assert!(Move::from_uci("e2e9").is_err());
        assert!(Move::from_uci("e2").is_err());
        assert!(Move::from_uci("e2e4qq").is_err());
        assert!(Move::from_uci("é2e4").is_err());
    }

    #[test]
    fn move_debug_display() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(format!("{:?}", m), "Move(e2e4)");
        assert_eq!(format!("{}", m), "e2e4");
    }
}
