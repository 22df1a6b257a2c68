//! Pieces, their orientation variants, and the catalog that owns them.
//!
//! # Variant Masks
//!
//! Every variant carries per-player masks laid out at the board's row stride,
//! so placing them is a shift:
//!
//! ```text
//! shape      occupancy (player 1)   exclusion (player 1)
//!                                     core    left  right
//!   01         01                      01
//!   11         11                      1f      0     1
//!                                      ff      1     1
//!                                      11
//! ```
//!
//! `f` marks all four player bits: the cell must be empty. `1` marks only the
//! placing player's bit: that player may not already own an edge neighbor.
//! The core spans the footprint's columns and one extra row above and below;
//! the ring columns left and right of the footprint sit in column 0 of their
//! own masks, so a variant as wide as the board never wraps into itself.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::bits::BitBoard;
use crate::error::CatalogError;
use crate::geometry::{Direction, Geometry, Pos, CELL_BITS, NEIGHBORS};
use crate::shape::Shape;
use crate::Player;

/// Index of a piece in its catalog.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece plus the index of one of its variants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct VariantId {
    pub piece: PieceId,
    pub index: u8,
}

/// Cells a placement needs free: the footprint for everyone, the orthogonal
/// ring for the placing player.
#[derive(Clone, Debug, Default)]
pub struct Exclusion {
    width: u8,
    /// Footprint plus the ring rows above and below, origin at local (0, -1).
    core: BitBoard,
    /// Ring cells of local column -1.
    left: BitBoard,
    /// Ring cells of local column `width`.
    right: BitBoard,
}

impl Exclusion {
    fn new(shape: &Shape, geometry: &Geometry, player: usize) -> Exclusion {
        let rows = shape.height() as usize;
        let row_bits = geometry.width() as usize * CELL_BITS;
        let width = shape.width() as i32;
        let mut core = BitBoard::zeros((rows + 2) * row_bits);
        let mut left = BitBoard::zeros(rows * row_bits);
        let mut right = BitBoard::zeros(rows * row_bits);

        for cell in shape.filled_cells() {
            let (cx, cy) = (cell.x as i32, cell.y as i32);
            for bit in 0..CELL_BITS {
                core.set(geometry.cell_bit(cell.x as usize, cell.y as usize + 1) + bit);
            }

            // Edge neighbors outside the shape may not hold the placing player
            for (dx, dy) in NEIGHBORS {
                let (nx, ny) = (cx + dx, cy + dy);
                if shape.filled(nx, ny) {
                    continue;
                }
                if nx < 0 {
                    left.set(geometry.cell_bit(0, ny as usize) + player);
                } else if nx == width {
                    right.set(geometry.cell_bit(0, ny as usize) + player);
                } else {
                    core.set(geometry.cell_bit(nx as usize, (ny + 1) as usize) + player);
                }
            }
        }

        Exclusion {
            width: shape.width(),
            core,
            left,
            right,
        }
    }

    #[inline]
    pub fn core(&self) -> &BitBoard {
        &self.core
    }

    #[inline]
    pub fn left(&self) -> &BitBoard {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &BitBoard {
        &self.right
    }

    /// True if the variant, top-left at `at`, overlaps any block or touches
    /// one of the player's own blocks along an edge.
    ///
    /// The bounding box must be on the board.
    pub fn collides(&self, geometry: &Geometry, occupancy: &BitBoard, at: Pos) -> bool {
        let len = geometry.bit_len();
        let stride = geometry.width() as isize;
        let (x, y) = (at.x as isize, at.y as isize);
        let cell = CELL_BITS as isize;

        // Ring rows off the top or bottom edge shift out of range
        if self
            .core
            .shifted_to(((y - 1) * stride + x) * cell, len)
            .intersects(occupancy)
        {
            return true;
        }
        // Ring columns off the side edges have nothing to touch
        if x > 0
            && self
                .left
                .shifted_to((y * stride + x - 1) * cell, len)
                .intersects(occupancy)
        {
            return true;
        }
        let right_x = x + self.width as isize;
        right_x < stride
            && self
                .right
                .shifted_to((y * stride + right_x) * cell, len)
                .intersects(occupancy)
    }
}

/// One fixed rotation/reflection of a piece, with precomputed masks.
#[derive(Clone, Debug)]
pub struct PieceVariant {
    id: VariantId,
    shape: Shape,
    /// Local filled cells that are outward corners, per direction.
    corners: [Vec<Pos>; Direction::COUNT],
    /// Per player: the filled cells, aligned at the board origin.
    occupancy: [BitBoard; Player::COUNT],
    exclusion: [Exclusion; Player::COUNT],
}

impl PieceVariant {
    /// Compute corners and masks for `shape`.
    ///
    /// A variant whose bounding box does not fit the board keeps empty masks;
    /// it has no placements.
    pub(crate) fn new(id: VariantId, shape: Shape, geometry: &Geometry) -> PieceVariant {
        let mut corners: [Vec<Pos>; Direction::COUNT] = Default::default();
        for cell in shape.filled_cells() {
            let (cx, cy) = (cell.x as i32, cell.y as i32);
            for dir in Direction::all() {
                let (dx, dy) = dir.delta();
                if !shape.filled(cx + dx, cy) && !shape.filled(cx, cy + dy) {
                    corners[dir.index()].push(cell);
                }
            }
        }

        let (occupancy, exclusion) = if geometry.contains_box(0, 0, shape.width(), shape.height())
        {
            let occupancy: [BitBoard; Player::COUNT] = std::array::from_fn(|player| {
                let mut mask = BitBoard::zeros(geometry.bit_len());
                for cell in shape.filled_cells() {
                    mask.set(geometry.cell_bit(cell.x as usize, cell.y as usize) + player);
                }
                mask
            });
            let exclusion: [Exclusion; Player::COUNT] =
                std::array::from_fn(|player| Exclusion::new(&shape, geometry, player));
            (occupancy, exclusion)
        } else {
            Default::default()
        };

        PieceVariant {
            id,
            shape,
            corners,
            occupancy,
            exclusion,
        }
    }

    #[inline]
    pub fn id(&self) -> VariantId {
        self.id
    }

    /// The piece this variant belongs to.
    #[inline]
    pub fn piece(&self) -> PieceId {
        self.id.piece
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.shape.width()
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.shape.height()
    }

    /// Local corner cells facing `dir`, in row-major order.
    #[inline]
    pub fn corners(&self, dir: Direction) -> &[Pos] {
        &self.corners[dir.index()]
    }

    /// Occupancy mask for `player`, unshifted.
    #[inline]
    pub fn occupancy(&self, player: Player) -> &BitBoard {
        &self.occupancy[player.index()]
    }

    /// Neighbor-exclusion masks for `player`, unshifted.
    #[inline]
    pub fn exclusion(&self, player: Player) -> &Exclusion {
        &self.exclusion[player.index()]
    }
}

/// A variant "is" its piece when asking whether that piece was used.
impl PartialEq<Piece> for PieceVariant {
    fn eq(&self, other: &Piece) -> bool {
        self.id.piece == other.id
    }
}

/// A polyomino and its distinct orientations.
///
/// Two pieces are equal when they are the same polyomino, whatever
/// orientation they were given in.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    /// Smallest image under the derived `Shape` ordering.
    canonical: Shape,
    cell_count: u32,
    variants: Vec<PieceVariant>,
}

impl Piece {
    /// Generate the distinct variants of `shape` for a board of `geometry`.
    pub fn new(id: PieceId, shape: &Shape, geometry: &Geometry) -> Result<Piece, CatalogError> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for image in shape.images() {
            if seen.insert(image.clone()) {
                unique.push(image);
            }
        }

        if !unique
            .iter()
            .any(|image| geometry.contains_box(0, 0, image.width(), image.height()))
        {
            return Err(CatalogError::PieceTooLarge {
                piece: id.index(),
                width: shape.width() as usize,
                height: shape.height() as usize,
                board_width: geometry.width() as usize,
                board_height: geometry.height() as usize,
            });
        }

        let canonical = unique.iter().min().cloned().unwrap_or_else(|| shape.clone());
        let variants = unique
            .into_iter()
            .enumerate()
            .map(|(index, image)| {
                let vid = VariantId {
                    piece: id,
                    index: index as u8,
                };
                PieceVariant::new(vid, image, geometry)
            })
            .collect();

        Ok(Piece {
            id,
            canonical,
            cell_count: shape.cell_count(),
            variants,
        })
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Number of filled cells, the same for every variant.
    #[inline]
    pub fn cell_count(&self) -> u32 {
        self.cell_count
    }

    /// Orientation-independent form used for identity.
    #[inline]
    pub fn canonical(&self) -> &Shape {
        &self.canonical
    }

    #[inline]
    pub fn variants(&self) -> &[PieceVariant] {
        &self.variants
    }

    #[inline]
    pub fn variant(&self, index: u8) -> Option<&PieceVariant> {
        self.variants.get(index as usize)
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

/// All pieces of one game, bound to one board size.
///
/// Pieces are stored by index; variants refer back to their piece through
/// `PieceId`, never by reference.
#[derive(Clone, Debug)]
pub struct Catalog {
    geometry: Geometry,
    pieces: Vec<Piece>,
}

impl Catalog {
    /// Build a catalog from parsed shapes. Piece ids follow the input order.
    ///
    /// The same polyomino may appear more than once; each copy is its own piece.
    pub fn new(width: usize, height: usize, shapes: &[Shape]) -> Result<Catalog, CatalogError> {
        let geometry = Geometry::new(width, height)?;
        if shapes.len() > u16::MAX as usize {
            return Err(CatalogError::TooManyPieces {
                count: shapes.len(),
            });
        }

        let pieces = shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| Piece::new(PieceId(index as u16), shape, &geometry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog { geometry, pieces })
    }

    /// Build a catalog from raw 0/1 grids.
    pub fn from_grids<R: AsRef<[u8]>>(
        width: usize,
        height: usize,
        grids: &[&[R]],
    ) -> Result<Catalog, CatalogError> {
        let shapes = grids
            .iter()
            .enumerate()
            .map(|(piece, &rows)| {
                Shape::from_rows(rows).map_err(|source| CatalogError::Shape { piece, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Catalog::new(width, height, &shapes)
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    #[inline]
    pub fn variant(&self, id: VariantId) -> Option<&PieceVariant> {
        self.piece(id.piece)?.variant(id.index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
