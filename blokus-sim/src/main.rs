//! Blokus self-play simulator
//!
//! Plays seeded games on the standard piece set and reports throughput.

use std::env;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use blokus_core::{standard, RenderOptions};
use blokus_sim::config::{Command, SimConfig};
use blokus_sim::error::SimError;
use blokus_sim::game::play_game;
use blokus_sim::record::MoveLog;
use blokus_sim::stats::SimStats;
use blokus_sim::strategy::build_strategy;
use log::{info, warn};
use rand::Rng;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  simulate [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>        JSON config, flags override it");
    eprintln!("  --games <n>            Number of games (default: 1)");
    eprintln!("  --seed <u64>           Seed of the first game (default: random)");
    eprintln!("  --strategy <name>      random | greedy | mobility | blocker | center | outward |");
    eprintln!("                         corner | advance | chase | avoid (default: random)");
    eprintln!("  --mix <name:ratio>     Play <name> instead with probability <ratio>");
    eprintln!("  --opening <name:n>     Play <name> for each player's first <n> moves");
    eprintln!("  --size <n>             Board side (default: 20)");
    eprintln!("  --show                 Print every final board");
    eprintln!("  --no-color             Plain board output");
    eprintln!("  --record <file>        Write a move log per game");
}

fn run(config: SimConfig) -> Result<(), SimError> {
    let catalog = Arc::new(standard::catalog(config.board_size, config.board_size)?);
    let mut strategy = build_strategy(&config)?;
    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());

    println!("Blokus Self-Play");
    println!("================");
    println!("Board: {0}x{0}", config.board_size);
    println!("Strategy: {}", strategy.name());
    println!("Games: {}", config.games);
    println!("Seed: {}", base_seed);
    println!();

    // Set up SIGINT handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping after the current move");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Cannot install Ctrl-C handler: {}", e);
    }

    let start = Instant::now();
    let mut stats = SimStats::new();

    for index in 0..config.games {
        let seed = base_seed.wrapping_add(index as u64);
        let (board, record) =
            play_game(Arc::clone(&catalog), strategy.as_mut(), seed, &running)?;
        stats.record_game(&record);

        info!(
            "game {} seed={} moves={} fingerprint={:016x}",
            index,
            seed,
            record.turns.len(),
            record.fingerprint
        );

        if config.show {
            println!("Game {} (seed {}):", index, seed);
            print!(
                "{}",
                board.render(RenderOptions {
                    color: config.color,
                    corners: false,
                })
            );
            println!();
        }

        if let Some(path) = config.record_path(index) {
            let saved = MoveLog::from_record(&record).save(&path)?;
            info!("Saved {} moves to {}", saved, path.display());
        }

        if stats.should_log(config.log_interval_secs) {
            stats.log_progress(config.games);
        }

        if !running.load(Ordering::SeqCst) {
            break;
        }
    }

    // Final stats
    println!("================");
    println!("Run complete!");
    println!("================");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!();
    stats.print_summary();

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let result = match SimConfig::from_args(&args) {
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(config)) => run(config),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if matches!(e, SimError::Usage(_)) {
                print_usage();
            }
            ExitCode::FAILURE
        }
    }
}
