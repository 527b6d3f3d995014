//! Text rendering of a game for the terminal.

use chess_core::Color;
use chess_engine::{Game, GameState, MoveRecord, Piece};

/// Number of log entries shown next to the board.
const LOG_LINES: usize = 10;

/// Long coordinate form of a logged move: `e2-e4`, `e4xd5`, `b7-b8=Q+`.
pub fn describe_move(record: &MoveRecord) -> String {
    let mut text = format!(
        "{}{}{}",
        record.from,
        if record.captured.is_some() { 'x' } else { '-' },
        record.to
    );
    if record.en_passant {
        text.push_str(" e.p.");
    }
    if let Some(kind) = record.promotion {
        text.push('=');
        text.push(kind.to_fen_char(Color::White));
    }
    if record.checkmate {
        text.push('#');
    } else if record.check {
        text.push('+');
    }
    text
}

fn pile(game: &Game, color: Color) -> String {
    game.captured(color)
        .map(|piece: &Piece| piece.kind().to_fen_char(piece.color()).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The board with captured pieces above and below it and the most recent
/// moves on the right.
pub fn render(game: &Game) -> String {
    let mut rows = vec![format!("   {}", pile(game, Color::White))];
    rows.extend(game.board().to_string().lines().map(str::to_string));
    rows.push(format!("   {}", pile(game, Color::Black)));

    let log = game.move_log();
    let recent = &log[log.len().saturating_sub(LOG_LINES.min(rows.len()))..];
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);

    rows.iter()
        .enumerate()
        .map(|(i, row)| match recent.get(i) {
            Some(record) => format!(
                "{:<width$}   {:>3}. {}",
                row,
                record.ply + 1,
                describe_move(record),
                width = width
            ),
            None => row.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line status shown under the board.
pub fn status_line(game: &Game) -> String {
    match game.state() {
        GameState::NotStarted => "Waiting for players".to_string(),
        GameState::Over(result) => format!("Game over: {}", result),
        GameState::Started => {
            let turn = game.turn();
            let name = game.player(turn).unwrap_or("?");
            let check = if game.is_check() { " (check)" } else { "" };
            format!("{} ({}) to move{}", name, turn, check)
        }
    }
}
