use thiserror::Error;

use crate::geometry::Pos;
use crate::piece::{PieceId, VariantId};
use crate::Player;

/// A shape grid that cannot describe a polyomino.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("shape has no rows or no columns")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({x}, {y}) holds {value}, expected 0 or 1")]
    InvalidCell { x: usize, y: usize, value: u8 },
    #[error("shape has no filled cells")]
    NoFilledCells,
    #[error("shape is {width}x{height}, sides are limited to 255 cells")]
    TooLarge { width: usize, height: usize },
}

/// A piece catalog that cannot be bound to a board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("board is {width}x{height}, sides must be between 3 and 255")]
    InvalidDimensions { width: usize, height: usize },
    #[error(
        "piece {piece} is {width}x{height}, no orientation fits a {board_width}x{board_height} board"
    )]
    PieceTooLarge {
        piece: usize,
        width: usize,
        height: usize,
        board_width: usize,
        board_height: usize,
    },
    #[error("catalog holds {count} pieces, at most 65535 are supported")]
    TooManyPieces { count: usize },
    #[error("piece {piece}: {source}")]
    Shape {
        piece: usize,
        #[source]
        source: ShapeError,
    },
}

/// A rejected call to `Board::place`. The board is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaceError {
    #[error("variant {0:?} is not in this board's catalog")]
    UnknownVariant(VariantId),
    #[error("player {player:?} does not hold piece {piece:?}")]
    PieceNotOwned { player: Player, piece: PieceId },
    #[error("variant {variant:?} at {at} leaves the board")]
    OutOfBounds { variant: VariantId, at: Pos },
    #[error("variant {variant:?} at {at} overlaps a piece or touches an own edge")]
    Blocked { variant: VariantId, at: Pos },
    #[error("variant {variant:?} at {at} does not cover an open corner")]
    NotAnchored { variant: VariantId, at: Pos },
}
