//! Binary move log for replaying self-play games.
//!
//! Format:
//! - Header (48 bytes):
//!   - Magic: "BLK1" (4 bytes)
//!   - Version: u32 LE (4 bytes)
//!   - Board width, height: u8, u8 (2 bytes)
//!   - Reserved: 6 bytes (zeros)
//!   - Seed: u64 LE (8 bytes)
//!   - Entry count: u64 LE (8 bytes)
//!   - Final board fingerprint: u64 LE (8 bytes)
//!   - Checksum: u64 LE xxhash of data section (8 bytes)
//! - Data section (entry_count × 5 bytes):
//!   - Player, piece, variant, x, y: u8 each
//!
//! Logs always refer to the standard piece set.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use blokus_core::{standard, Board, Move, PieceId, Player, Pos, VariantId};
use xxhash_rust::xxh64::xxh64;

use crate::error::SimError;
use crate::game::{fingerprint, GameRecord, Turn};

const MAGIC: &[u8; 4] = b"BLK1";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 48;
const ENTRY_SIZE: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveLog {
    pub width: u8,
    pub height: u8,
    pub seed: u64,
    pub fingerprint: u64,
    pub turns: Vec<Turn>,
}

impl MoveLog {
    pub fn from_record(record: &GameRecord) -> MoveLog {
        MoveLog {
            width: record.width,
            height: record.height,
            seed: record.seed,
            fingerprint: record.fingerprint,
            turns: record.turns.clone(),
        }
    }

    /// Serialize the log.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let count = self.turns.len();

        // Build data section
        let mut data = Vec::with_capacity(count * ENTRY_SIZE);
        for turn in &self.turns {
            let piece = u8::try_from(turn.mov.variant.piece.0).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("piece {} does not fit the log format", turn.mov.variant.piece.0),
                )
            })?;
            data.extend_from_slice(&[
                turn.player.index() as u8,
                piece,
                turn.mov.variant.index,
                turn.mov.at.x,
                turn.mov.at.y,
            ]);
        }

        let checksum = xxh64(&data, 0);

        // Header
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&[self.width, self.height])?;
        writer.write_all(&[0u8; 6])?; // Reserved
        writer.write_all(&self.seed.to_le_bytes())?;
        writer.write_all(&(count as u64).to_le_bytes())?;
        writer.write_all(&self.fingerprint.to_le_bytes())?;
        writer.write_all(&checksum.to_le_bytes())?;

        // Data
        writer.write_all(&data)?;
        writer.flush()?;

        Ok(count)
    }

    /// Parse a log, validating magic, version and checksum.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<MoveLog> {
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(invalid("Invalid move log magic".to_string()));
        }

        let version = read_u32(&header[4..8]);
        if version != VERSION {
            return Err(invalid(format!("Unsupported move log version: {}", version)));
        }

        let width = header[8];
        let height = header[9];
        let seed = read_u64(&header[16..24]);
        let count = read_u64(&header[24..32]) as usize;
        let fingerprint = read_u64(&header[32..40]);
        let stored_checksum = read_u64(&header[40..48]);

        // Read data section
        let data_len = count
            .checked_mul(ENTRY_SIZE)
            .ok_or_else(|| invalid(format!("Move log entry count too large: {}", count)))?;
        let mut data = Vec::new();
        reader
            .by_ref()
            .take(data_len as u64)
            .read_to_end(&mut data)?;
        if data.len() != data_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Move log data section is truncated",
            ));
        }

        let computed_checksum = xxh64(&data, 0);
        if computed_checksum != stored_checksum {
            return Err(invalid("Move log checksum mismatch".to_string()));
        }

        let mut turns = Vec::with_capacity(count);
        for entry in data.chunks_exact(ENTRY_SIZE) {
            let player = Player::from_index(entry[0] as usize)
                .ok_or_else(|| invalid(format!("Invalid player in move log: {}", entry[0])))?;
            let variant = VariantId {
                piece: PieceId(entry[1] as u16),
                index: entry[2],
            };
            let mov = Move {
                variant,
                at: Pos::new(entry[3], entry[4]),
            };
            turns.push(Turn { player, mov });
        }

        Ok(MoveLog {
            width,
            height,
            seed,
            fingerprint,
            turns,
        })
    }

    /// Save to a file.
    pub fn save(&self, path: &Path) -> io::Result<usize> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
    }

    /// Load from a file.
    pub fn load(path: &Path) -> io::Result<MoveLog> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        MoveLog::read_from(&mut reader)
    }

    /// Get file size for a given number of moves.
    pub fn estimate_size(count: usize) -> usize {
        HEADER_SIZE + count * ENTRY_SIZE
    }

    /// Re-apply every move on a fresh board and check the final fingerprint.
    pub fn replay(&self) -> Result<Board, SimError> {
        let catalog = standard::catalog(self.width as usize, self.height as usize)?;
        let mut board = Board::new(Arc::new(catalog));
        for turn in &self.turns {
            board.place(turn.player, turn.mov.variant, turn.mov.at)?;
        }

        let actual = fingerprint(&board);
        if actual != self.fingerprint {
            return Err(SimError::FingerprintMismatch {
                expected: self.fingerprint,
                actual,
            });
        }
        Ok(board)
    }
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
