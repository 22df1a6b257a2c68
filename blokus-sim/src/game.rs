//! One self-play game from the empty board to four passes in a row.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blokus_core::{Board, Catalog, Move, PlaceError, Player};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

use crate::strategy::Strategy;

/// A placement made during a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub player: Player,
    pub mov: Move,
}

/// Everything needed to reproduce and summarize a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub width: u8,
    pub height: u8,
    pub turns: Vec<Turn>,
    pub passes: u32,
    /// Pieces placed per player.
    pub placed: [u32; Player::COUNT],
    /// Cells covered per player.
    pub cells: [u32; Player::COUNT],
    pub fingerprint: u64,
    /// Stopped early by the interrupt flag.
    pub interrupted: bool,
}

/// Hash of the packed occupancy.
pub fn fingerprint(board: &Board) -> u64 {
    let bytes: Vec<u8> = board
        .occupancy()
        .words()
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect();
    xxh64(&bytes, 0)
}

/// Play one game. Players move in seat order; a player without moves passes.
///
/// Stops after the current move once `running` is cleared.
pub fn play_game(
    catalog: Arc<Catalog>,
    strategy: &mut dyn Strategy,
    seed: u64,
    running: &AtomicBool,
) -> Result<(Board, GameRecord), PlaceError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new(catalog);
    let mut record = GameRecord {
        seed,
        width: board.width(),
        height: board.height(),
        turns: Vec::new(),
        passes: 0,
        placed: [0; Player::COUNT],
        cells: [0; Player::COUNT],
        fingerprint: 0,
        interrupted: false,
    };

    let mut player = Player::One;
    let mut passes_in_row = 0;
    while passes_in_row < Player::COUNT {
        if !running.load(Ordering::SeqCst) {
            warn!("game {} interrupted after {} moves", seed, record.turns.len());
            record.interrupted = true;
            break;
        }

        match strategy.choose(&board, player, &mut rng) {
            Some(mov) => {
                board.place(player, mov.variant, mov.at)?;
                let size = board
                    .catalog()
                    .piece(mov.piece())
                    .map_or(0, |p| p.cell_count());
                record.placed[player.index()] += 1;
                record.cells[player.index()] += size;
                record.turns.push(Turn { player, mov });
                passes_in_row = 0;
            }
            None => {
                debug!("{:?} passes", player);
                record.passes += 1;
                passes_in_row += 1;
            }
        }
        player = player.next();
    }

    record.fingerprint = fingerprint(&board);
    Ok((board, record))
}
