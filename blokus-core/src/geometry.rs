//! Board coordinates, diagonal directions and the packed cell layout.
//!
//! # Cell Layout
//!
//! ```text
//! bit(x, y, player) = (y * W + x) * 4 + player
//!
//! one cell:   bit 3   bit 2   bit 1   bit 0
//!             Four    Three   Two     One
//! ```
//!
//! Piece masks use the same row stride `W`, so moving a mask to board cell
//! `(x, y)` is a single shift by `(y * W + x) * 4` bits. A 3x3 corner template
//! centered on column 0 or column `W - 1` spills into the neighboring row; the
//! edge guards mask those bits off again.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::BitBoard;
use crate::error::CatalogError;
use crate::Player;

/// Bits per cell, one per player.
pub const CELL_BITS: usize = 4;

/// Smallest supported board side.
pub const MIN_SIDE: usize = 3;
/// Largest supported board side.
pub const MAX_SIDE: usize = u8::MAX as usize;

/// A cell on the board, or a local cell inside a piece's bounding box.
///
/// Ordered row-major: by `y`, then by `x`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[inline]
    pub const fn new(x: u8, y: u8) -> Pos {
        Pos { x, y }
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Diagonal class of a corner, as `(dx, dy)` signs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// (-1, -1): up and to the left.
    NegNeg = 0,
    /// (-1, +1): down and to the left.
    NegPos = 1,
    /// (+1, -1): up and to the right.
    PosNeg = 2,
    /// (+1, +1): down and to the right.
    PosPos = 3,
}

impl Direction {
    pub const COUNT: usize = 4;

    pub const ALL: [Direction; 4] = [
        Direction::NegNeg,
        Direction::NegPos,
        Direction::PosNeg,
        Direction::PosPos,
    ];

    /// Storage index (0-3).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit step `(dx, dy)`.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::NegNeg => (-1, -1),
            Direction::NegPos => (-1, 1),
            Direction::PosNeg => (1, -1),
            Direction::PosPos => (1, 1),
        }
    }

    /// The point-symmetric direction.
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::NegNeg => Direction::PosPos,
            Direction::NegPos => Direction::PosNeg,
            Direction::PosNeg => Direction::NegPos,
            Direction::PosPos => Direction::NegNeg,
        }
    }

    /// Iterate over all four directions in storage order.
    pub fn all() -> impl Iterator<Item = Direction> {
        Self::ALL.into_iter()
    }
}

/// Orthogonal unit steps.
pub(crate) const NEIGHBORS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Size-dependent layout shared by every board of one size.
///
/// Holds the edge guards and the single-cell corner templates, both of which
/// are pre-aligned to row stride `W` like the piece masks.
#[derive(Clone, Debug)]
pub struct Geometry {
    width: u8,
    height: u8,
    /// Every cell except column 0.
    without_first_column: BitBoard,
    /// Every cell except column `W - 1`.
    without_last_column: BitBoard,
    /// Per player: all bits at padded (1, 1), the player's bit at its four
    /// orthogonal neighbors.
    corner_templates: [BitBoard; Player::COUNT],
}

impl Geometry {
    /// Build the layout for a `width` x `height` board.
    pub fn new(width: usize, height: usize) -> Result<Geometry, CatalogError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&width) || !(MIN_SIDE..=MAX_SIDE).contains(&height) {
            return Err(CatalogError::InvalidDimensions { width, height });
        }

        let len = width * height * CELL_BITS;
        let mut without_first_column = BitBoard::ones(len);
        let mut without_last_column = BitBoard::ones(len);
        for y in 0..height {
            for bit in 0..CELL_BITS {
                without_first_column.clear((y * width) * CELL_BITS + bit);
                without_last_column.clear((y * width + width - 1) * CELL_BITS + bit);
            }
        }

        let corner_templates = std::array::from_fn(|player| {
            let mut template = BitBoard::zeros(len);
            for bit in 0..CELL_BITS {
                template.set((width + 1) * CELL_BITS + bit);
            }
            for (dx, dy) in NEIGHBORS {
                let x = (1 + dx) as usize;
                let y = (1 + dy) as usize;
                template.set((y * width + x) * CELL_BITS + player);
            }
            template
        });

        Ok(Geometry {
            width: width as u8,
            height: height as u8,
            without_first_column,
            without_last_column,
            corner_templates,
        })
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Total bits in a board-sized mask.
    #[inline]
    pub fn bit_len(&self) -> usize {
        self.width as usize * self.height as usize * CELL_BITS
    }

    /// Index of the first bit of cell `(x, y)` at row stride `W`.
    #[inline]
    pub fn cell_bit(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CELL_BITS
    }

    /// True if `(x, y)` is on the board.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// True if a `width` x `height` box with its top-left at `(x, y)` is on the board.
    #[inline]
    pub fn contains_box(&self, x: i32, y: i32, width: u8, height: u8) -> bool {
        x >= 0
            && y >= 0
            && x + width as i32 <= self.width as i32
            && y + height as i32 <= self.height as i32
    }

    /// Left-edge exclusion mask: all bits set except in column 0.
    pub fn without_first_column(&self) -> &BitBoard {
        &self.without_first_column
    }

    /// Right-edge exclusion mask: all bits set except in column `W - 1`.
    pub fn without_last_column(&self) -> &BitBoard {
        &self.without_last_column
    }

    /// Move a 3x3 template so that its center lands on `cell`.
    ///
    /// The column left of `x == 0` wraps into the last column of the row
    /// above, and the one right of `x == W - 1` wraps into the first column
    /// of the row below; both are cleared.
    fn align_template(&self, template: &BitBoard, cell: Pos) -> BitBoard {
        let stride = self.width as isize;
        let shift = ((cell.y as isize - 1) * stride + (cell.x as isize - 1)) * CELL_BITS as isize;
        let mut aligned = template.shifted(shift);
        if cell.x == 0 {
            aligned &= &self.without_last_column;
        }
        if cell.x + 1 == self.width {
            aligned &= &self.without_first_column;
        }
        aligned
    }

    /// Single-cell corner test against a packed occupancy.
    ///
    /// The cell must be empty and none of its orthogonal neighbors may carry
    /// `player`'s bit.
    pub(crate) fn is_open_corner(&self, occupancy: &BitBoard, player: Player, cell: Pos) -> bool {
        let template = &self.corner_templates[player.index()];
        !self
            .align_template(template, cell)
            .intersects(occupancy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_ordering_is_row_major() {
        let mut cells = vec![Pos::new(3, 1), Pos::new(0, 2), Pos::new(5, 0), Pos::new(1, 1)];
        cells.sort();
        assert_eq!(
            cells,
            vec![Pos::new(5, 0), Pos::new(1, 1), Pos::new(3, 1), Pos::new(0, 2)]
        );
    }

    #[test]
    fn test_direction_opposite() {
        for dir in Direction::all() {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            assert_eq!(dir.opposite().delta(), (-dx, -dy));
            assert_eq!(dir.opposite().index(), 3 - dir.index());
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Geometry::new(2, 20),
            Err(CatalogError::InvalidDimensions { width: 2, height: 20 })
        ));
        assert!(Geometry::new(20, 256).is_err());
        assert!(Geometry::new(3, 3).is_ok());
    }

    #[test]
    fn test_edge_guards_clear_one_column() {
        let geometry = Geometry::new(5, 4).unwrap();
        let len = geometry.bit_len();
        assert_eq!(geometry.without_first_column().count_ones() as usize, len - 4 * 4);
        assert_eq!(geometry.without_last_column().count_ones() as usize, len - 4 * 4);

        for y in 0..4 {
            assert_eq!(geometry.without_first_column().nibble(geometry.cell_bit(0, y)), 0);
            assert_eq!(geometry.without_first_column().nibble(geometry.cell_bit(4, y)), 0xF);
            assert_eq!(geometry.without_last_column().nibble(geometry.cell_bit(4, y)), 0);
            assert_eq!(geometry.without_last_column().nibble(geometry.cell_bit(0, y)), 0xF);
        }
    }

    #[test]
    fn test_corner_template_at_left_edge_does_not_wrap() {
        let geometry = Geometry::new(5, 5).unwrap();
        let mut occupancy = BitBoard::zeros(geometry.bit_len());

        // Player One owns the last cell of row 1: without the edge guard the
        // template at (0, 2) would see it as its left neighbor.
        occupancy.set(geometry.cell_bit(4, 1));
        assert!(geometry.is_open_corner(&occupancy, Player::One, Pos::new(0, 2)));

        // A real left neighbor of (4, 2) is (3, 2).
        occupancy.set(geometry.cell_bit(3, 2));
        assert!(!geometry.is_open_corner(&occupancy, Player::One, Pos::new(4, 2)));
        // Other players are not affected by Player One's edges
        assert!(geometry.is_open_corner(&occupancy, Player::Two, Pos::new(4, 2)));
    }

    #[test]
    fn test_corner_template_at_right_edge_does_not_wrap() {
        let geometry = Geometry::new(5, 5).unwrap();
        let mut occupancy = BitBoard::zeros(geometry.bit_len());

        // First cell of row 3 sits right after the last cell of row 2.
        occupancy.set(geometry.cell_bit(0, 3) + Player::Three.index());
        assert!(geometry.is_open_corner(&occupancy, Player::Three, Pos::new(4, 2)));
        assert!(!geometry.is_open_corner(&occupancy, Player::Three, Pos::new(0, 2)));
    }

    #[test]
    fn test_corner_template_rejects_occupied_cell() {
        let geometry = Geometry::new(6, 6).unwrap();
        let mut occupancy = BitBoard::zeros(geometry.bit_len());
        occupancy.set(geometry.cell_bit(2, 2) + Player::Four.index());

        // Occupied by anyone: closed for everyone
        for player in Player::all() {
            assert!(!geometry.is_open_corner(&occupancy, player, Pos::new(2, 2)));
        }
        // Diagonal neighbor is fine
        assert!(geometry.is_open_corner(&occupancy, Player::Four, Pos::new(3, 3)));
        // Orthogonal neighbor only for the owner
        assert!(!geometry.is_open_corner(&occupancy, Player::Four, Pos::new(2, 3)));
        assert!(geometry.is_open_corner(&occupancy, Player::One, Pos::new(2, 3)));
    }

    #[test]
    fn test_corner_template_in_board_corners() {
        let geometry = Geometry::new(4, 4).unwrap();
        let occupancy = BitBoard::zeros(geometry.bit_len());
        for (x, y) in [(0, 0), (3, 0), (0, 3), (3, 3)] {
            assert!(geometry.is_open_corner(&occupancy, Player::One, Pos::new(x, y)));
        }
    }
}
