use std::io;
use std::io::prelude::*;

use anyhow::{bail, Context};
use chessmoves::chess::board::{Board, MailboxBoard};
use chessmoves::chess::core::{Player, Position};
use chessmoves::chess::moves::{Move, MoveFlags};
use itertools::Itertools;

fn print_moves(moves: impl IntoIterator<Item = Move>) {
    println!("{}", moves.into_iter().map(|m| m.to_string()).join(" "));
}

/// Finds the generated move described in UCI format: origin and destination
/// squares, followed by `q` for a promotion.
fn find_move(board: &MailboxBoard, uci: &str) -> anyhow::Result<Move> {
    let uci = uci.trim();
    let (Some(from), Some(to), Some(promotion)) = (uci.get(0..2), uci.get(2..4), uci.get(4..))
    else {
        bail!("move should be in UCI format (e.g. e2e4), got {uci}");
    };
    if !matches!(promotion, "" | "q") {
        bail!("move should be in UCI format (e.g. e2e4 or b7b8q), got {uci}");
    }
    let from = Position::try_from(from)?;
    let to = Position::try_from(to)?;
    let Some(piece) = board.piece_at(from) else {
        bail!("there is no piece on {from}");
    };
    let next_move = piece
        .generate_moves(board)
        .into_iter()
        .find(|m| m.to() == to)
        .with_context(|| format!("{} on {from} can not move to {to}", piece.occupant()))?;
    if promotion == "q" && !next_move.flags().contains(MoveFlags::PROMOTION) {
        bail!("{next_move} is not a promotion, got {uci}");
    }
    Ok(next_move)
}

fn execute(board: &mut MailboxBoard, command: &str) -> anyhow::Result<()> {
    if let Some(fen) = command.strip_prefix("position ") {
        *board = match fen.trim() {
            "startpos" => MailboxBoard::starting(),
            fen => MailboxBoard::try_from(fen)?,
        };
    } else if let Some(square) = command.strip_prefix("moves ") {
        let position = Position::try_from(square.trim())?;
        let Some(piece) = board.piece_at(position) else {
            bail!("there is no piece on {position}");
        };
        print_moves(piece.generate_moves(&*board));
    } else if command == "moves" {
        let white = board.generate_moves(Player::White);
        let black = board.generate_moves(Player::Black);
        print_moves(white.into_iter().chain(black));
    } else if let Some(uci) = command.strip_prefix("move ") {
        let next_move = find_move(board, uci)?;
        board.make_move(&next_move)?;
    } else if command == "d" {
        println!("{board:?}");
        println!("{board}");
    } else {
        bail!("unknown command: {command}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    chessmoves::print_build_info();
    let mut board = MailboxBoard::starting();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading command from stdin")?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command == "quit" {
            break;
        }
        if let Err(e) = execute(&mut board, command) {
            println!("Error: {e:#}");
        }
    }
    Ok(())
}
