//! Command-line driver: perft enumeration, divide breakdowns, and root
//! move-ordering dumps over a FEN position.

use anyhow::{bail, Context, Result};
use tracing::info;

use lucena_core::{divide, perft, Board, STARTING_FEN};
use lucena_search::RootMoveGenerator;

const USAGE: &str = "usage: lucena <perft|divide> <depth> [fen]
       lucena order [fen]

With no FEN the starting position is used.";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{USAGE}");
    };

    match command.as_str() {
        "perft" | "divide" => {
            let depth: usize = args
                .get(1)
                .with_context(|| USAGE.to_string())?
                .parse()
                .context("depth must be a non-negative integer")?;
            let board = parse_position(&args[2..])?;
            if command == "perft" {
                run_perft(&board, depth);
            } else {
                run_divide(&board, depth);
            }
        }
        "order" => {
            let board = parse_position(&args[1..])?;
            run_order(&board);
        }
        other => bail!("unknown command `{other}`\n{USAGE}"),
    }

    Ok(())
}

/// The remaining arguments joined as a FEN, or the starting position.
fn parse_position(args: &[String]) -> Result<Board> {
    let fen = if args.is_empty() {
        STARTING_FEN.to_string()
    } else {
        args.join(" ")
    };
    let board: Board = fen.parse().with_context(|| format!("invalid FEN `{fen}`"))?;
    board.validate().with_context(|| format!("inconsistent position `{fen}`"))?;
    Ok(board)
}

fn run_perft(board: &Board, depth: usize) {
    let start = std::time::Instant::now();
    let nodes = perft(board, depth);
    let elapsed = start.elapsed();
    info!(depth, nodes, ?elapsed, "perft complete");
    println!("{nodes}");
}

fn run_divide(board: &Board, depth: usize) {
    let results = divide(board, depth);
    let mut total = 0u64;
    for (mv, nodes) in &results {
        println!("{mv}: {nodes}");
        total += nodes;
    }
    println!("total: {total} ({} moves)", results.len());
}

fn run_order(board: &Board) {
    println!("{board}");
    let generator = RootMoveGenerator::new(board);
    for (rank, entry) in generator.entries().iter().enumerate() {
        println!("{:>3}. {:<6} score {}", rank + 1, entry.mv.to_uci(), entry.score);
    }
    if generator.is_empty() {
        let verdict = if board.in_check() { "checkmate" } else { "stalemate" };
        println!("no legal moves: {verdict}");
    }
}
