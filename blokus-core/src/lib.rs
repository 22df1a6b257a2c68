//! Blokus legal-move engine with bit-packed board and piece masks.
//!
//! # Board Encoding
//!
//! ```text
//! W x H cells, 4 bits per cell, row-major, stored in Vec<u64>:
//!
//!   bit(x, y, player) = (y * W + x) * 4 + player
//!
//! Each cell (4 bits), one-hot:
//!   0000 = empty
//!   0001 = Player One    0010 = Player Two
//!   0100 = Player Three  1000 = Player Four
//! ```
//!
//! # Placement Test
//!
//! ```text
//! legal(variant, player, x, y) =
//!     box inside the board
//!  && (core[player]  << ((y - 1) * W + x) * 4)      & occupancy == 0
//!  && (left[player]  << (y * W + x - 1) * 4)        & occupancy == 0   if x > 0
//!  && (right[player] << (y * W + x + width) * 4)    & occupancy == 0   if x + width < W
//!  && some corner of the variant sits on one of the player's anchors
//! ```
//!
//! Pieces are owned by a [`Catalog`] built once per board size and shared by
//! every [`Board`] through an `Arc`. Legal moves are enumerated from each
//! player's anchor frontier, never by scanning the whole board.

pub mod bits;
pub mod board;
pub mod error;
pub mod geometry;
pub mod piece;
pub mod render;
pub mod shape;
pub mod standard;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

pub use bits::BitBoard;
pub use board::{Board, Move};
pub use error::{CatalogError, PlaceError, ShapeError};
pub use geometry::{Direction, Geometry, Pos};
pub use piece::{Catalog, Exclusion, Piece, PieceId, PieceVariant, VariantId};
pub use render::{RenderOptions, Snapshot};
pub use shape::Shape;

/// Player seat, in turn order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
}

impl Player {
    pub const COUNT: usize = 4;

    /// Seat index (0-3), also the player's bit within a cell.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Convert from a seat index (0-3).
    #[inline]
    pub fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::One),
            1 => Some(Player::Two),
            2 => Some(Player::Three),
            3 => Some(Player::Four),
            _ => None,
        }
    }

    /// The player moving after this one.
    #[inline]
    pub fn next(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::Three,
            Player::Three => Player::Four,
            Player::Four => Player::One,
        }
    }

    /// Display digit, `'1'` to `'4'`.
    #[inline]
    pub fn digit(self) -> char {
        (b'1' + self as u8) as char
    }

    /// Iterate over all seats in turn order.
    pub fn all() -> impl Iterator<Item = Player> {
        [Player::One, Player::Two, Player::Three, Player::Four].into_iter()
    }
}
