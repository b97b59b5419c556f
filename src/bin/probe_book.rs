use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use kalah_book::board::{Board, Side};
use kalah_book::book::FlatBook;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        eprintln!("usage: probe_book <book dir> <well> <well> ...");
        return ExitCode::from(1);
    }

    let dir = PathBuf::from(&args[1]);
    let mut board = Board::new();
    let mut side = Side::South;
    for arg in args.iter().skip(2) {
        let Ok(well) = arg.parse::<usize>() else {
            eprintln!("not a well: {arg}");
            return ExitCode::from(1);
        };
        match board.apply_move(well, side) {
            Ok(sown) => {
                board = sown.board;
                side = sown.next_to_move();
            }
            Err(e) => {
                eprintln!("move {well}: {e}");
                return ExitCode::from(1);
            }
        }
    }

    let paths: Vec<PathBuf> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("flat_"))
            })
            .collect(),
        Err(e) => {
            eprintln!("{}: {e}", dir.display());
            return ExitCode::from(1);
        }
    };
    let book = match FlatBook::load(&paths) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    println!("{board}");
    println!("side_to_move: {side}");
    println!("key: {}", board.key());
    println!("outcome: {:?}", board.outcome());
    println!("book_records: {}", book.len());
    match book.probe(&board, side) {
        Some(record) => println!(
            "book: move {} score {} depth {}",
            record.best_move, record.score, record.depth
        ),
        None => println!("book: -"),
    }
    for well in board.legal_moves(side) {
        println!("{well}");
    }
    ExitCode::SUCCESS
}
