//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates and square labels
//! - [`Move`] for from/to move pairs
//! - FEN piece placement parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, Placement};
pub use mov::Move;
pub use piece::PieceKind;
pub use square::{File, InvalidPosition, Rank, Square};
