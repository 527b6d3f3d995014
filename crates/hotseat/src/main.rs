//! Hot seat chess - two players take turns at one terminal.
//!
//! Moves are typed as two squares (`e2 e4`) or in coordinate form (`e2e4`).
//! `quit` leaves the game.

mod config;
mod render;

use anyhow::Context;
use chess_core::{Color, Move};
use chess_engine::{Game, Player};
use clap::Parser;
use config::HotseatConfig;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hot seat chess for two players at one terminal.
#[derive(Parser)]
#[command(name = "hotseat")]
#[command(about = "Play chess against a friend at the same keyboard")]
struct Args {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from a custom placement (FEN, side to move optional)
    #[arg(long)]
    fen: Option<String>,

    /// Name of the white player
    #[arg(long)]
    white: Option<String>,

    /// Name of the black player
    #[arg(long)]
    black: Option<String>,
}

/// A line of input split into source and destination labels.
fn parse_input(line: &str) -> Option<(String, String)> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(from), Some(to), None) => Some((from.to_string(), to.to_string())),
        (Some(uci), None, None) => {
            let m = Move::from_uci(uci).ok()?;
            Some((m.from.to_label(), m.to.to_label()))
        }
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = HotseatConfig::load(args.config.as_deref()).context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen).context("parsing --fen")?,
        None => Game::new(),
    };

    let white = Player::new(
        Color::White,
        args.white.unwrap_or_else(|| config.players.white.clone()),
    );
    let black = Player::new(
        Color::Black,
        args.black.unwrap_or_else(|| config.players.black.clone()),
    );
    white.join(&mut game)?;
    black.join(&mut game)?;
    game.start()?;
    tracing::info!("{} vs {}", white.name(), black.name());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    println!("{}", render::render(&game));
    while !game.is_over() {
        println!("{}", render::status_line(&game));
        let player = match game.turn() {
            Color::White => &white,
            Color::Black => &black,
        };
        print!("{} move: ", player.name());
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let Some((from, to)) = parse_input(line) else {
            println!("Type a move as two squares, e.g. 'e2 e4'.");
            continue;
        };
        match player.move_piece(&mut game, &from, &to) {
            Ok(record) => {
                if config.show_board {
                    println!("{}", render::render(&game));
                } else {
                    println!("{}", render::describe_move(&record));
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    println!("{}", render::status_line(&game));
    Ok(())
}
