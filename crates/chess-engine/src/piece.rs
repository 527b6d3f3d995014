//! Piece entities.
//!
//! A [`Piece`] is the long-lived identity behind a board occupant: it keeps
//! its id, its move history and its captured flag for the whole game. The
//! game owns all pieces in an arena indexed by [`PieceId`]; captured pieces
//! stay in the arena and promotion replaces the entity stored under the same
//! id.

use crate::board::Occupant;
use chess_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a piece, assigned once at setup in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Returns the arena index of this id.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One committed move in a piece's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub from: Square,
    pub to: Square,
    /// Index of the move in the game's move log.
    pub ply: usize,
}

impl HistoryEntry {
    /// Rank difference covered by the move.
    #[inline]
    pub const fn rank_delta(&self) -> i8 {
        self.from.delta(self.to).1
    }
}

/// Plain description of a piece, for move logs and captured piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceInfo {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
}

impl fmt::Display for PieceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.color, self.kind, self.id)
    }
}

/// A chess piece with identity and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    position: Square,
    history: Vec<HistoryEntry>,
    captured: bool,
    promoted: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, color: Color, position: Square) -> Self {
        Piece {
            id,
            kind,
            color,
            position,
            history: Vec::new(),
            captured: false,
            promoted: false,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current square. For a captured piece, the square it was taken on.
    #[inline]
    pub fn position(&self) -> Square {
        self.position
    }

    /// Committed moves in order.
    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// True if this piece started the game as a pawn and was promoted.
    #[inline]
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        !self.history.is_empty()
    }

    /// The square this piece stood on before its first move.
    pub fn starting_square(&self) -> Square {
        self.history
            .first()
            .map_or(self.position, |entry| entry.from)
    }

    pub fn info(&self) -> PieceInfo {
        PieceInfo {
            id: self.id,
            kind: self.kind,
            color: self.color,
        }
    }

    /// The board cell reference for this piece.
    pub fn occupant(&self) -> Occupant {
        Occupant {
            id: self.id,
            kind: self.kind,
            color: self.color,
            has_moved: self.has_moved(),
        }
    }

    pub(crate) fn record_move(&mut self, from: Square, to: Square, ply: usize) {
        self.history.push(HistoryEntry { from, to, ply });
        self.position = to;
    }

    pub(crate) fn mark_captured(&mut self) {
        self.captured = true;
    }

    /// Builds the piece that replaces this one after promotion: same id,
    /// color, position and history, new kind.
    pub(crate) fn promoted_into(&self, kind: PieceKind) -> Piece {
        Piece {
            kind,
            promoted: true,
            ..self.clone()
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.color, self.kind, self.position)
    }
}
