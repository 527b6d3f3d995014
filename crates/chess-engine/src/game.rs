//! Full game management with history tracking.
//!
//! The [`Game`] struct owns everything a game of chess needs besides the
//! rules themselves:
//! - the board and the piece registry, captured pieces included
//! - turn order and the player slots
//! - the move log and the captured piles
//!
//! A move is validated against an immutable board first and only then
//! committed, so a rejected move never leaves any trace.

use crate::board::BoardSnapshot;
use crate::movegen::{self, MoveError};
use crate::piece::{Piece, PieceId, PieceInfo};
use crate::rules::{CheckStatus, GameResult, RuleSet, StandardChess};
use crate::{Bitboard, Board};
use chess_core::{Color, FenError, InvalidPosition, Move, PieceKind, Placement, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Waiting for players.
    NotStarted,
    /// Moves are accepted.
    Started,
    /// Ended by checkmate or stalemate; no further moves are accepted.
    Over(GameResult),
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidPosition(#[from] InvalidPosition),

    #[error("illegal move: {0}")]
    IllegalMove(MoveError),

    #[error("{0} is already occupied by one of your pieces")]
    OccupiedByOwnColor(Square),

    #[error("it's not {0}'s turn")]
    NotYourTurn(Color),

    #[error("the piece at {0} isn't yours")]
    NotYourPiece(Square),

    #[error("the game hasn't started yet")]
    GameNotStarted,

    #[error("the game has already started")]
    GameAlreadyStarted,

    #[error("the game is over")]
    GameOver,

    #[error("{0} already has a player")]
    PlayerSlotTaken(Color),

    #[error("{0} has no player yet")]
    MissingPlayer(Color),

    #[error("there is no piece at {0}")]
    NoPieceAt(Square),

    #[error("there is no piece {0}")]
    UnknownPiece(PieceId),

    #[error("piece {0} has been captured")]
    PieceCaptured(PieceId),
}

impl From<MoveError> for GameError {
    fn from(e: MoveError) -> Self {
        match e {
            MoveError::OccupiedByOwnColor(sq) => GameError::OccupiedByOwnColor(sq),
            other => GameError::IllegalMove(other),
        }
    }
}

/// One committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Index in the move log, starting at zero.
    pub ply: usize,
    pub from: Square,
    pub to: Square,
    /// The piece that moved, as it is after promotion.
    pub piece: PieceInfo,
    pub captured: Option<PieceInfo>,
    pub en_passant: bool,
    pub promotion: Option<PieceKind>,
    /// Whether the move gives check to the opponent.
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
}

impl MoveRecord {
    /// The move as a from/to pair.
    pub fn mov(&self) -> Move {
        Move::new(self.from, self.to)
    }
}

/// Plain-data view of a game for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: BoardSnapshot,
    pub turn: Color,
    pub state: GameState,
    pub moves: Vec<MoveRecord>,
    /// White pieces that were captured.
    pub captured_white: Vec<PieceInfo>,
    /// Black pieces that were captured.
    pub captured_black: Vec<PieceInfo>,
}

/// A complete chess game with history tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    /// Piece registry indexed by [`PieceId`]. Entries are never removed.
    pieces: Vec<Piece>,
    /// Captured pieces by the color of the captured piece.
    captured: [Vec<PieceId>; 2],
    moves: Vec<MoveRecord>,
    players: [Option<String>; 2],
    turn: Color,
    state: GameState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_placement(&Placement::default())
    }

    /// Creates a game from a parsed placement.
    pub fn from_placement(placement: &Placement) -> Self {
        let pieces = placement
            .pieces()
            .enumerate()
            .map(|(id, (sq, kind, color))| Piece::new(PieceId(id as u8), kind, color, sq))
            .collect();

        Game {
            board: Board::from_placement(placement),
            pieces,
            captured: [Vec::new(), Vec::new()],
            moves: Vec::new(),
            players: [None, None],
            turn: placement.side_to_move,
            state: GameState::NotStarted,
        }
    }

    /// Creates a game from a FEN string (placement and optional side to move).
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_placement(&Placement::parse(fen)?))
    }

    /// Takes the player slot of `color`.
    pub fn add_player(&mut self, color: Color, name: impl Into<String>) -> Result<(), GameError> {
        if self.state != GameState::NotStarted {
            return Err(GameError::GameAlreadyStarted);
        }
        let slot = &mut self.players[color.index()];
        if slot.is_some() {
            return Err(GameError::PlayerSlotTaken(color));
        }
        *slot = Some(name.into());
        Ok(())
    }

    /// Starts the game once both colors have a player.
    ///
    /// A custom setup may already be decided; the game then goes straight
    /// to [`GameState::Over`].
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.state != GameState::NotStarted {
            return Err(GameError::GameAlreadyStarted);
        }
        if let Some(color) = Color::ALL
            .into_iter()
            .find(|color| self.players[color.index()].is_none())
        {
            return Err(GameError::MissingPlayer(color));
        }

        self.state = GameState::Started;
        tracing::info!("Game started, {} to move", self.turn);

        if let Some(result) = StandardChess.game_result(&self.board, self.turn) {
            self.finish(result);
        }
        Ok(())
    }

    /// Moves the piece with the given id to the square labelled `target`.
    ///
    /// On success the move is committed and its log entry returned. On
    /// failure nothing changes.
    pub fn move_piece(&mut self, id: PieceId, target: &str) -> Result<MoveRecord, GameError> {
        self.ensure_in_progress()?;

        let piece = self.piece(id).ok_or(GameError::UnknownPiece(id))?;
        if piece.is_captured() {
            return Err(GameError::PieceCaptured(id));
        }
        if piece.color() != self.turn {
            return Err(GameError::NotYourTurn(piece.color()));
        }
        let from = piece.position();
        let to = Square::from_label(target)?;

        let outcome = StandardChess.validate(&self.board, from, to).map_err(|e| {
            tracing::debug!("Rejected {}{}: {}", from, to, e);
            GameError::from(e)
        })?;

        let ply = self.moves.len();
        let captured = outcome.captured.map(|capture| {
            let victim = &mut self.pieces[capture.occupant.id.index()];
            victim.mark_captured();
            self.captured[victim.color().index()].push(victim.id());
            victim.info()
        });

        self.board = movegen::make_move(&self.board, from, to, &outcome);

        let piece = &mut self.pieces[id.index()];
        piece.record_move(from, to, ply);
        if let Some(kind) = outcome.promotion {
            let promoted = piece.promoted_into(kind);
            *piece = promoted;
        }
        let mover = piece.info();

        let opponent = mover.color.opposite();
        let status = StandardChess.status(&self.board, opponent);
        let record = MoveRecord {
            ply,
            from,
            to,
            piece: mover,
            captured,
            en_passant: outcome.captured.is_some_and(|capture| capture.square != to),
            promotion: outcome.promotion,
            check: status.check,
            checkmate: status.checkmate,
            stalemate: status.stalemate,
        };
        tracing::debug!(
            "Move {}: {} {}{}{}",
            ply,
            mover,
            from,
            to,
            captured.map_or(String::new(), |c| format!(" takes {}", c))
        );

        self.moves.push(record);
        self.turn = opponent;
        if let Some(result) = status.result(opponent) {
            self.finish(result);
        }
        Ok(record)
    }

    /// Moves the piece standing on the square labelled `from`.
    pub fn move_from(&mut self, from: &str, target: &str) -> Result<MoveRecord, GameError> {
        self.ensure_in_progress()?;
        let id = self.piece_at_label(from)?.id();
        self.move_piece(id, target)
    }

    /// Returns true if moving the piece to `to` is allowed by its movement
    /// rule but would leave its own king in check.
    ///
    /// Moves that break the movement rule itself are reported as errors.
    pub fn would_expose_king(&self, id: PieceId, to: Square) -> Result<bool, GameError> {
        let piece = self.piece(id).ok_or(GameError::UnknownPiece(id))?;
        if piece.is_captured() {
            return Err(GameError::PieceCaptured(id));
        }
        let from = piece.position();
        let outcome = movegen::pseudo_legal(&self.board, from, to)?;
        Ok(movegen::exposes_king(&self.board, from, to, &outcome))
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.state {
            GameState::NotStarted => Err(GameError::GameNotStarted),
            GameState::Over(_) => Err(GameError::GameOver),
            GameState::Started => Ok(()),
        }
    }

    fn finish(&mut self, result: GameResult) {
        self.state = GameState::Over(result);
        tracing::info!("Game over after {} moves: {}", self.moves.len(), result);
    }

    fn piece_at_label(&self, label: &str) -> Result<&Piece, GameError> {
        let sq = Square::from_label(label)?;
        self.piece_at(sq).ok_or(GameError::NoPieceAt(sq))
    }

    /// Returns a reference to the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Looks up a piece by id, captured or not.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// The whole registry, in id order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The piece currently standing on `sq`.
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.board
            .occupant(sq)
            .and_then(|occupant| self.piece(occupant.id))
    }

    /// Returns the move log.
    pub fn move_log(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Pieces of `color` that have been captured, oldest first.
    pub fn captured(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.captured[color.index()]
            .iter()
            .filter_map(|id| self.piece(*id))
    }

    /// Pieces captured by `color`, oldest first.
    pub fn captured_by(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.captured(color.opposite())
    }

    /// Name of the player holding `color`.
    pub fn player(&self, color: Color) -> Option<&str> {
        self.players[color.index()].as_deref()
    }

    /// The color to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state != GameState::NotStarted
    }

    /// Returns true if the game has ended.
    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Over(_))
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        match self.state {
            GameState::Over(result) => Some(result),
            _ => None,
        }
    }

    /// The winning color, if the game ended in checkmate.
    pub fn winner(&self) -> Option<Color> {
        self.result().and_then(GameResult::winner)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        StandardChess.is_check(&self.board, self.turn)
    }

    /// Check classification of `color` on the current board.
    pub fn status(&self, color: Color) -> CheckStatus {
        StandardChess.status(&self.board, color)
    }

    /// Returns all legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        StandardChess.generate_moves(&self.board, self.turn)
    }

    /// Squares the piece on `from` may legally move to.
    pub fn legal_targets(&self, from: Square) -> Bitboard {
        movegen::legal_targets(&self.board, from)
    }

    /// Returns the current position as a two-field FEN string.
    pub fn to_fen(&self) -> String {
        let side = match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{} {}", self.board.placement(), side)
    }

    /// Plain-data copy of everything a renderer shows.
    pub fn snapshot(&self) -> GameSnapshot {
        let pile = |color: Color| -> Vec<PieceInfo> {
            self.captured(color).map(Piece::info).collect()
        };
        GameSnapshot {
            board: self.board.snapshot(),
            turn: self.turn,
            state: self.state,
            moves: self.moves.clone(),
            captured_white: pile(Color::White),
            captured_black: pile(Color::Black),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(label: &str) -> Square {
        Square::from_label(label).unwrap()
    }

    fn started(fen: &str) -> Game {
        let mut game = Game::from_fen(fen).unwrap();
        game.add_player(Color::White, "white").unwrap();
        game.add_player(Color::Black, "black").unwrap();
        game.start().unwrap();
        game
    }

    fn new_game() -> Game {
        started(Placement::STARTPOS)
    }

    #[test]
    fn lifecycle() {
        let mut game = Game::new();
        assert_eq!(game.state(), GameState::NotStarted);
        assert_eq!(game.move_from("e2", "e4"), Err(GameError::GameNotStarted));
        assert_eq!(game.start(), Err(GameError::MissingPlayer(Color::White)));

        game.add_player(Color::White, "alice").unwrap();
        assert_eq!(
            game.add_player(Color::White, "bob"),
            Err(GameError::PlayerSlotTaken(Color::White))
        );
        assert_eq!(game.start(), Err(GameError::MissingPlayer(Color::Black)));
        game.add_player(Color::Black, "bob").unwrap();
        game.start().unwrap();

        assert!(game.is_started());
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.player(Color::Black), Some("bob"));
        assert_eq!(game.start(), Err(GameError::GameAlreadyStarted));
        assert_eq!(
            game.add_player(Color::Black, "carol"),
            Err(GameError::GameAlreadyStarted)
        );
    }

    #[test]
    fn turns_alternate() {
        let mut game = new_game();
        assert_eq!(
            game.move_from("e7", "e5"),
            Err(GameError::NotYourTurn(Color::Black))
        );
        game.move_from("e2", "e4").unwrap();
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(
            game.move_from("d2", "d4"),
            Err(GameError::NotYourTurn(Color::White))
        );
        game.move_from("e7", "e5").unwrap();
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn move_by_id() {
        let mut game = new_game();
        let knight = game.piece_at(sq("g1")).unwrap().id();
        assert_eq!(knight, PieceId(30));
        let record = game.move_piece(knight, "f3").unwrap();
        assert_eq!(record.ply, 0);
        assert_eq!(record.piece.kind, PieceKind::Knight);
        assert_eq!(game.piece(knight).unwrap().position(), sq("f3"));
        assert_eq!(
            game.move_piece(PieceId(99), "f3"),
            Err(GameError::UnknownPiece(PieceId(99)))
        );
    }

    #[test]
    fn label_errors() {
        let mut game = new_game();
        assert_eq!(
            game.move_from("e2", "e9"),
            Err(GameError::InvalidPosition(InvalidPosition("e9".to_string())))
        );
        assert_eq!(
            game.move_from("z2", "e4"),
            Err(GameError::InvalidPosition(InvalidPosition("z2".to_string())))
        );
        assert_eq!(
            game.move_from("e4", "e5"),
            Err(GameError::NoPieceAt(sq("e4")))
        );
    }

    #[test]
    fn own_color_occupancy() {
        let mut game = new_game();
        assert_eq!(
            game.move_from("a1", "a2"),
            Err(GameError::OccupiedByOwnColor(sq("a2")))
        );
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut game = new_game();
        game.move_from("e2", "e4").unwrap();
        let before = game.clone();
        assert!(matches!(
            game.move_from("f8", "a3"),
            Err(GameError::IllegalMove(MoveError::Blocked(_)))
        ));
        assert!(game.move_from("e8", "e6").is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn capture_goes_to_pile() {
        let mut game = new_game();
        game.move_from("e2", "e4").unwrap();
        game.move_from("d7", "d5").unwrap();
        let record = game.move_from("e4", "d5").unwrap();

        let captured = record.captured.unwrap();
        assert_eq!(captured.kind, PieceKind::Pawn);
        assert_eq!(captured.color, Color::Black);
        assert!(!record.en_passant);

        let pile: Vec<_> = game.captured(Color::Black).map(Piece::id).collect();
        assert_eq!(pile, vec![captured.id]);
        assert_eq!(game.captured_by(Color::White).count(), 1);
        assert_eq!(game.captured(Color::White).count(), 0);

        let victim = game.piece(captured.id).unwrap();
        assert!(victim.is_captured());
        assert_eq!(
            game.move_piece(captured.id, "d4"),
            Err(GameError::PieceCaptured(captured.id))
        );
    }

    #[test]
    fn promotion_keeps_id_and_history() {
        let mut game = started("4k3/1P6/8/8/8/8/8/4K3 w");
        let pawn = game.piece_at(sq("b7")).unwrap().id();
        let record = game.move_piece(pawn, "b8").unwrap();
        assert_eq!(record.promotion, Some(PieceKind::Queen));
        assert_eq!(record.piece.kind, PieceKind::Queen);
        assert!(record.check);

        let queen = game.piece(pawn).unwrap();
        assert_eq!(queen.kind(), PieceKind::Queen);
        assert!(queen.is_promoted());
        assert_eq!(queen.history().len(), 1);
        assert_eq!(queen.starting_square(), sq("b7"));
        assert_eq!(
            game.board().occupant(sq("b8")).map(|o| (o.id, o.kind)),
            Some((pawn, PieceKind::Queen))
        );
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut game = new_game();
        game.move_from("f2", "f3").unwrap();
        game.move_from("e7", "e5").unwrap();
        game.move_from("g2", "g4").unwrap();
        let record = game.move_from("d8", "h4").unwrap();

        assert!(record.check && record.checkmate && !record.stalemate);
        assert_eq!(game.result(), Some(GameResult::BlackWins));
        assert_eq!(game.winner(), Some(Color::Black));
        assert!(game.is_over());
        assert_eq!(game.move_from("a2", "a3"), Err(GameError::GameOver));
    }

    #[test]
    fn stalemate_is_a_draw() {
        let mut game = started("7k/8/5Q2/8/8/8/8/6K1 w");
        let record = game.move_from("f6", "f7").unwrap();
        assert!(record.stalemate && !record.check && !record.checkmate);
        assert_eq!(
            game.result(),
            Some(GameResult::Draw(crate::rules::DrawReason::Stalemate))
        );
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn decided_setup_is_over_at_start() {
        let game = started("7k/5Q2/6K1/8/8/8/8/8 b");
        assert_eq!(
            game.result(),
            Some(GameResult::Draw(crate::rules::DrawReason::Stalemate))
        );
    }

    #[test]
    fn would_expose_king() {
        let game = started("4r1k1/8/8/8/8/8/4B3/4K3 w");
        let bishop = game.piece_at(sq("e2")).unwrap().id();
        assert_eq!(game.would_expose_king(bishop, sq("d3")), Ok(true));
        let king = game.piece_at(sq("e1")).unwrap().id();
        assert_eq!(game.would_expose_king(king, sq("d1")), Ok(false));
        assert!(game.would_expose_king(bishop, sq("e4")).is_err());
    }

    #[test]
    fn legal_moves_and_targets() {
        let game = new_game();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.legal_targets(sq("b1")).count(), 2);
        assert!(game.legal_targets(sq("e4")).is_empty());
    }

    #[test]
    fn fen_and_snapshot() {
        let mut game = new_game();
        game.move_from("e2", "e4").unwrap();
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"
        );

        let snapshot = game.snapshot();
        assert_eq!(snapshot.turn, Color::Black);
        assert_eq!(snapshot.moves.len(), 1);
        assert!(snapshot.board.cell(sq("e4")).is_some());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn registry_and_board_agree() {
        let mut game = new_game();
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5"), ("d8", "d5")] {
            game.move_from(from, to).unwrap();
        }
        for piece in game.pieces().iter().filter(|p| !p.is_captured()) {
            assert_eq!(
                game.board().occupant(piece.position()).map(|o| o.id),
                Some(piece.id())
            );
        }
        assert_eq!(game.board().iter().count(), 30);
    }
}
