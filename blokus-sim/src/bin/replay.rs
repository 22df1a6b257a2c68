//! Replay a self-play move log and verify the final board.
//!
//! Usage:
//!   cargo run --release --bin replay -- game.blk

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use blokus_sim::error::SimError;
use blokus_sim::record::MoveLog;

fn replay(path: &Path) -> Result<(), SimError> {
    let start = Instant::now();
    let log = MoveLog::load(path)?;
    println!(
        "Loaded {} moves ({}x{}, seed {}) from {}",
        log.turns.len(),
        log.width,
        log.height,
        log.seed,
        path.display()
    );

    let board = log.replay()?;
    println!("{}", board);
    println!(
        "Fingerprint {:016x} verified in {:.3}s",
        log.fingerprint,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage:");
        eprintln!("  replay <move log>");
        return ExitCode::FAILURE;
    }

    match replay(Path::new(&args[1])) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
