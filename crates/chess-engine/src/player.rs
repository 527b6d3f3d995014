//! Player seat.

use crate::game::{Game, GameError, MoveRecord};
use chess_core::{Color, Square};

/// A participant bound to one color.
///
/// Players only ever move their own pieces; the game itself accepts a move
/// from any caller as long as it is that color's turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    color: Color,
    name: String,
}

impl Player {
    pub fn new(color: Color, name: impl Into<String>) -> Self {
        Player {
            color,
            name: name.into(),
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Takes this player's color slot in `game`.
    pub fn join(&self, game: &mut Game) -> Result<(), GameError> {
        game.add_player(self.color, self.name.as_str())
    }

    /// Moves the player's piece on `from` to `to`.
    pub fn move_piece(
        &self,
        game: &mut Game,
        from: &str,
        to: &str,
    ) -> Result<MoveRecord, GameError> {
        let sq = Square::from_label(from)?;
        let piece = game.piece_at(sq).ok_or(GameError::NoPieceAt(sq))?;
        if piece.color() != self.color {
            return Err(GameError::NotYourPiece(sq));
        }
        let id = piece.id();
        game.move_piece(id, to)
    }
}
