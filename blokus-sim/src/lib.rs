//! Self-play driver for blokus-core.
//!
//! Plays seeded games with simple move-selection strategies, records them in
//! a compact binary log, and replays logs to verify the engine is
//! deterministic.

pub mod config;
pub mod error;
pub mod game;
pub mod record;
pub mod stats;
pub mod strategy;
