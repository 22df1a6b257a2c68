use std::io;

use blokus_core::{CatalogError, PlaceError};
use thiserror::Error;

/// Failures of the driver binaries.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("cannot build pieces: {0}")]
    Catalog(#[from] CatalogError),
    #[error("illegal move: {0}")]
    Place(#[from] PlaceError),
    #[error("{0}")]
    Usage(String),
    #[error("final board {actual:016x} does not match recorded {expected:016x}")]
    FingerprintMismatch { expected: u64, actual: u64 },
}
