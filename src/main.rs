use anyhow::Context;
use clap::Parser;
use hnefatafl_rules::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Play Hnefatafl on the console, two players sharing one keyboard.
///
/// Type a destination (`d6`) when only one of your pieces can get there,
/// or an origin and a destination (`a6 d6`). `moves` lists your legal moves,
/// `quit` ends the session.
#[derive(Parser)]
#[command(name = "hnefatafl-rules")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Starting position: standard (11x11) or standard_7x7
    #[arg(long, default_value_t = Variant::Standard)]
    variant: Variant,

    /// JSON file with a custom starting layout; overrides --variant
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Print results as JSON lines instead of drawing the board
    #[arg(long)]
    json: bool,

    /// Draw pieces as blocks and the open lanes between them
    #[arg(long, conflicts_with = "json")]
    lanes: bool,
}

enum Input {
    Move(MoveRequest),
    ListMoves,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["quit" | "exit"] => Some(Input::Quit),
        ["moves"] => Some(Input::ListMoves),
        [to] => Some(Input::Move(MoveRequest::destination(*to))),
        [from, to] => Some(Input::Move(MoveRequest::explicit(*from, *to))),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let layout = match &cli.layout {
        Some(path) => Layout::from_json_file(path)
            .with_context(|| format!("loading layout from {}", path.display()))?,
        None => cli.variant.layout(),
    };
    let mut board = Board::new(&layout).context("invalid starting layout")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    show_board(&board, &cli)?;
    let mut prompt = turn_prompt(&board);

    while !board.is_game_over() {
        if !cli.json {
            print!("{prompt}");
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;

        let request = match parse_input(&line) {
            Some(Input::Quit) => return Ok(()),
            Some(Input::ListMoves) => {
                let moves: Vec<String> = board
                    .legal_moves(board.turn())
                    .into_iter()
                    .map(|mv| format!("{} {}", board.notation(mv.from), board.notation(mv.to)))
                    .collect();
                println!("{}", moves.join(", "));
                continue;
            }
            Some(Input::Move(request)) => request,
            None => {
                prompt = "Write origin and destination square in chess notation, separated by a space.\nTry again: ".to_string();
                continue;
            }
        };

        match board.play(&request) {
            Ok(report) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    announce_captures(&board, &report);
                    show_board(&board, &cli)?;
                }
                prompt = turn_prompt(&board);
            }
            Err(err) => {
                if cli.json {
                    let rejection = serde_json::json!({
                        "rejected": err.code(),
                        "detail": err.to_string(),
                    });
                    println!("{rejection}");
                } else {
                    println!("{err}");
                }
                prompt = "Try again: ".to_string();
            }
        }
    }

    if !cli.json {
        match board.status() {
            GameStatus::AttackersWon => {
                println!("The King is dead.");
                println!("The attackers have won!");
            }
            GameStatus::DefendersWon => {
                println!("The King managed to escape.");
                println!("The defenders have won!");
            }
            GameStatus::Playing => {}
        }
    }

    Ok(())
}

fn turn_prompt(board: &Board) -> String {
    match board.turn() {
        Side::Attackers => "Attackers turn: ".to_string(),
        Side::Defenders => "Defenders turn: ".to_string(),
    }
}

fn show_board(board: &Board, cli: &Cli) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string(&board.snapshot())?);
    } else if cli.lanes {
        print!("{board:#}");
    } else {
        print!("{board}");
    }
    Ok(())
}

fn announce_captures(board: &Board, report: &MoveReport) {
    for capture in &report.captures {
        let at = board.notation(capture.position);
        match capture.piece {
            Occupant::Attacker => println!("The defenders killed an attacker standing at {at}!"),
            Occupant::Defender => println!("The attackers killed a defender standing at {at}!"),
            Occupant::King => println!("The attackers captured the king at {at}!"),
            Occupant::Empty | Occupant::OffBoard => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_shapes() {
        assert!(matches!(
            parse_input("d6"),
            Some(Input::Move(MoveRequest::Destination { to })) if to == "d6"
        ));
        assert!(matches!(
            parse_input("  a6   d6 "),
            Some(Input::Move(MoveRequest::Explicit { from, to })) if from == "a6" && to == "d6"
        ));
        assert!(matches!(parse_input("moves"), Some(Input::ListMoves)));
        assert!(matches!(parse_input("quit"), Some(Input::Quit)));
        assert!(parse_input("").is_none());
        assert!(parse_input("a1 a2 a3").is_none());
    }
}
