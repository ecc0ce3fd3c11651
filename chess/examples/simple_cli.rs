// Simple command-line application to play chess

use stakechess::{Board, Coord, PrettyStyle};
use std::io::{self, BufRead, Write};

fn parse_pair(s: &str) -> Option<(Coord, Coord)> {
    if s.len() != 4 {
        return None;
    }
    let from: Coord = s[..2].parse().ok()?;
    let to: Coord = s[2..].parse().ok()?;
    Some((from, to))
}

fn main() {
    let mut stdin = io::stdin().lock();
    let mut board = Board::initial();

    loop {
        if let Some(outcome) = board.outcome() {
            println!("Game finished: {}", outcome);
            println!("Moves: {}", board.history().join(" "));
            break;
        }

        println!("{}", board.pretty(PrettyStyle::Ascii));
        let side = board.turn();
        if board.is_in_check(side) {
            println!("{} is in check", side.name());
        }
        print!("{} move (e.g. e2e4, or 'resign'): ", side.name());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let s = s.trim();

        if s == "resign" {
            board.resign(side);
            continue;
        }

        let Some((from, to)) = parse_pair(s) else {
            println!("Expected a move like e2e4");
            println!();
            continue;
        };
        if let Err(e) = board.apply_move(from, to) {
            println!("Bad move: {}", e);
        }
        println!();
    }
}
